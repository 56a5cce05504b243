// src/application/stores/codes.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::{security::TokenGenerator, time::Clock},
};
use crate::domain::client::Client;
use crate::domain::grant::{AuthorizationCode, AuthorizationCodeRepository, OwnerId};
use crate::domain::scope::ScopeSet;
use chrono::Duration;
use std::sync::Arc;

/// Mints and redeems single-use authorization codes.
pub struct CodeStore {
    repo: Arc<dyn AuthorizationCodeRepository>,
    generator: Arc<dyn TokenGenerator>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl CodeStore {
    pub fn new(
        repo: Arc<dyn AuthorizationCodeRepository>,
        generator: Arc<dyn TokenGenerator>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            repo,
            generator,
            clock,
            ttl,
        }
    }

    pub async fn issue(
        &self,
        client: &Client,
        owner_id: &OwnerId,
        scope: ScopeSet,
        redirect_uri: &str,
    ) -> ApplicationResult<AuthorizationCode> {
        let now = self.clock.now();
        let code = AuthorizationCode {
            code: self.generator.generate(),
            client_id: client.id.clone(),
            owner_id: owner_id.clone(),
            scope,
            redirect_uri: redirect_uri.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };

        self.repo.insert(code.clone()).await?;
        Ok(code)
    }

    /// Redeem a code. The code is gone after this call whatever the outcome,
    /// so a second redemption always fails.
    pub async fn consume(&self, code: &str) -> ApplicationResult<AuthorizationCode> {
        let stored = self
            .repo
            .take(code)
            .await?
            .ok_or_else(|| ApplicationError::invalid_grant("authorization code is invalid or already used"))?;

        if stored.is_expired(self.clock.now()) {
            return Err(ApplicationError::invalid_grant("authorization code has expired"));
        }

        Ok(stored)
    }
}
