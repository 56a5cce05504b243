// src/application/commands/revoke.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    registry::{ClientCredentials, ClientRegistry},
    stores::TokenStore,
};
use std::sync::Arc;

pub struct RevokeTokenCommand {
    pub client: ClientCredentials,
    pub token: String,
}

/// Token revocation on behalf of the client the token was issued to.
pub struct RevocationService {
    registry: Arc<ClientRegistry>,
    tokens: Arc<TokenStore>,
}

impl RevocationService {
    pub fn new(registry: Arc<ClientRegistry>, tokens: Arc<TokenStore>) -> Self {
        Self { registry, tokens }
    }

    /// Unknown tokens are accepted silently so callers cannot probe for
    /// valid token strings.
    pub async fn revoke(&self, command: RevokeTokenCommand) -> ApplicationResult<()> {
        if command.token.is_empty() {
            return Err(ApplicationError::invalid_request("token is required"));
        }

        let client = self.registry.authenticate_request(&command.client, None).await?;

        match self.tokens.client_of(&command.token).await? {
            Some(owner) if owner == client.id => {
                self.tokens.revoke(&command.token).await?;
                tracing::info!(client_id = %client.id, "token revoked");
                Ok(())
            }
            Some(_) => Err(ApplicationError::unauthorized_client(
                "token was issued to another client",
            )),
            None => Ok(()),
        }
    }
}
