use crate::domain::client::{entity::Client, value_objects::ClientId};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn find_by_id(&self, id: &ClientId) -> DomainResult<Option<Client>>;
}
