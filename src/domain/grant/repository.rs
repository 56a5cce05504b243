// src/domain/grant/repository.rs
use crate::domain::errors::DomainResult;
use crate::domain::grant::{
    entity::{AccessToken, AuthorizationCode, RefreshToken},
    value_objects::GrantId,
};
use async_trait::async_trait;

#[async_trait]
pub trait AuthorizationCodeRepository: Send + Sync {
    async fn insert(&self, code: AuthorizationCode) -> DomainResult<()>;

    /// Atomically remove the code and return the stored value if present.
    /// Concurrent callers for the same code never both receive `Some`.
    async fn take(&self, code: &str) -> DomainResult<Option<AuthorizationCode>>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn insert_access(&self, token: AccessToken) -> DomainResult<()>;

    async fn find_access(&self, token: &str) -> DomainResult<Option<AccessToken>>;

    async fn insert_refresh(&self, token: RefreshToken) -> DomainResult<()>;

    async fn find_refresh(&self, token: &str) -> DomainResult<Option<RefreshToken>>;

    /// Atomically remove the refresh token and return the stored value if present.
    async fn take_refresh(&self, token: &str) -> DomainResult<Option<RefreshToken>>;

    /// Returns false when the token is unknown.
    async fn revoke_access(&self, token: &str) -> DomainResult<bool>;

    /// Returns false when the token is unknown.
    async fn revoke_refresh(&self, token: &str) -> DomainResult<bool>;

    /// Revoke every access token minted under the given grant.
    async fn revoke_grant_access(&self, grant_id: &GrantId) -> DomainResult<()>;
}
