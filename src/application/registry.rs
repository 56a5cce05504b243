// src/application/registry.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::SecretHasher,
};
use crate::domain::client::{Client, ClientId, ClientRepository, GrantType};
use std::sync::Arc;

/// Client credentials as presented on a request, either through HTTP Basic
/// or the `client_id`/`client_secret` form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: Option<String>,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: Option<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.filter(|secret| !secret.is_empty()),
        }
    }

    pub fn public(client_id: impl Into<String>) -> Self {
        Self::new(client_id, None)
    }
}

pub struct ClientRegistry {
    clients: Arc<dyn ClientRepository>,
    hasher: Arc<dyn SecretHasher>,
}

impl ClientRegistry {
    pub fn new(clients: Arc<dyn ClientRepository>, hasher: Arc<dyn SecretHasher>) -> Self {
        Self { clients, hasher }
    }

    pub async fn lookup(&self, client_id: &str) -> ApplicationResult<Client> {
        let id = ClientId::new(client_id)
            .map_err(|_| ApplicationError::not_found("client id is empty"))?;
        self.clients
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("unknown client '{id}'")))
    }

    /// Verify a confidential client's secret. Public clients never
    /// authenticate by secret and always yield `false`.
    pub async fn authenticate(&self, client_id: &str, secret: &str) -> ApplicationResult<bool> {
        let client = self.lookup(client_id).await?;
        self.verify_secret(&client, secret).await
    }

    async fn verify_secret(&self, client: &Client, secret: &str) -> ApplicationResult<bool> {
        match client.secret_hash.as_deref() {
            Some(hash) if client.is_confidential() => self.hasher.verify(secret, hash).await,
            _ => Ok(false),
        }
    }

    /// Authenticate the client behind a token-endpoint request and check it
    /// may use `grant`. Unknown clients and bad secrets are `InvalidClient`;
    /// a grant outside the client's registration is `UnauthorizedClient`.
    pub async fn authenticate_request(
        &self,
        credentials: &ClientCredentials,
        grant: Option<GrantType>,
    ) -> ApplicationResult<Client> {
        let client = match self.lookup(&credentials.client_id).await {
            Ok(client) => client,
            Err(ApplicationError::NotFound(_)) => {
                return Err(ApplicationError::invalid_client("client authentication failed"));
            }
            Err(err) => return Err(err),
        };

        match (client.is_confidential(), credentials.client_secret.as_deref()) {
            (true, Some(secret)) => {
                if !self.verify_secret(&client, secret).await? {
                    tracing::debug!(client_id = %client.id, "client secret mismatch");
                    return Err(ApplicationError::invalid_client("client authentication failed"));
                }
            }
            (true, None) => {
                return Err(ApplicationError::invalid_client(
                    "confidential client must authenticate with its secret",
                ));
            }
            (false, Some(_)) => {
                return Err(ApplicationError::invalid_client(
                    "public client must not present a secret",
                ));
            }
            (false, None) => {}
        }

        if let Some(grant) = grant {
            if !client.allows_grant(grant) {
                return Err(ApplicationError::unauthorized_client(format!(
                    "client is not permitted to use the {grant} grant"
                )));
            }
        }

        Ok(client)
    }
}
