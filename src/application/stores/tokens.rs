// src/application/stores/tokens.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::{security::TokenGenerator, time::Clock},
};
use crate::domain::client::{Client, ClientId};
use crate::domain::grant::{AccessToken, GrantId, OwnerId, RefreshToken, TokenRepository};
use crate::domain::scope::ScopeSet;
use chrono::Duration;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: Duration,
    /// `None` issues refresh tokens that never expire.
    pub refresh: Option<Duration>,
}

/// Issues, looks up and revokes access and refresh tokens.
pub struct TokenStore {
    repo: Arc<dyn TokenRepository>,
    generator: Arc<dyn TokenGenerator>,
    clock: Arc<dyn Clock>,
    lifetimes: TokenLifetimes,
}

impl TokenStore {
    pub fn new(
        repo: Arc<dyn TokenRepository>,
        generator: Arc<dyn TokenGenerator>,
        clock: Arc<dyn Clock>,
        lifetimes: TokenLifetimes,
    ) -> Self {
        Self {
            repo,
            generator,
            clock,
            lifetimes,
        }
    }

    pub async fn issue_access_token(
        &self,
        client: &Client,
        owner_id: Option<&OwnerId>,
        scope: &ScopeSet,
        grant_id: GrantId,
        refresh_token: Option<&RefreshToken>,
    ) -> ApplicationResult<AccessToken> {
        let now = self.clock.now();
        let token = AccessToken {
            token: self.generator.generate(),
            grant_id,
            client_id: client.id.clone(),
            owner_id: owner_id.cloned(),
            scope: scope.clone(),
            created_at: now,
            expires_at: now + self.lifetimes.access,
            refresh_token: refresh_token.map(|refresh| refresh.token.clone()),
            revoked: false,
        };

        self.repo.insert_access(token.clone()).await?;
        Ok(token)
    }

    pub async fn issue_refresh_token(
        &self,
        client: &Client,
        owner_id: &OwnerId,
        scope: &ScopeSet,
        grant_id: GrantId,
    ) -> ApplicationResult<RefreshToken> {
        let now = self.clock.now();
        let token = RefreshToken {
            token: self.generator.generate(),
            grant_id,
            client_id: client.id.clone(),
            owner_id: owner_id.clone(),
            scope: scope.clone(),
            created_at: now,
            expires_at: self.lifetimes.refresh.map(|ttl| now + ttl),
            revoked: false,
        };

        self.repo.insert_refresh(token.clone()).await?;
        Ok(token)
    }

    /// Unknown, expired and revoked tokens are all `InvalidGrant`.
    pub async fn lookup_access_token(&self, token: &str) -> ApplicationResult<AccessToken> {
        match self.repo.find_access(token).await? {
            Some(stored) if stored.is_active(self.clock.now()) => Ok(stored),
            _ => Err(ApplicationError::invalid_grant("access token is invalid or expired")),
        }
    }

    /// Non-consuming lookup, used when refresh tokens are not rotated.
    pub async fn lookup_refresh_token(&self, token: &str) -> ApplicationResult<RefreshToken> {
        match self.repo.find_refresh(token).await? {
            Some(stored) if stored.is_active(self.clock.now()) => Ok(stored),
            _ => Err(ApplicationError::invalid_grant("refresh token is invalid or expired")),
        }
    }

    /// Atomically redeem a refresh token; at most one caller succeeds.
    pub async fn consume_refresh_token(&self, token: &str) -> ApplicationResult<RefreshToken> {
        match self.repo.take_refresh(token).await? {
            Some(stored) if stored.is_active(self.clock.now()) => Ok(stored),
            _ => Err(ApplicationError::invalid_grant("refresh token is invalid, expired or already used")),
        }
    }

    /// Permanently invalidate an access or refresh token. Revoking a refresh
    /// token also revokes the access tokens minted under the same grant.
    /// Unknown tokens are ignored.
    pub async fn revoke(&self, token: &str) -> ApplicationResult<()> {
        if self.repo.revoke_access(token).await? {
            return Ok(());
        }

        if let Some(refresh) = self.repo.find_refresh(token).await? {
            self.repo.revoke_refresh(token).await?;
            self.repo.revoke_grant_access(&refresh.grant_id).await?;
        }

        Ok(())
    }

    /// The client a token was issued to, regardless of its expiry.
    pub async fn client_of(&self, token: &str) -> ApplicationResult<Option<ClientId>> {
        if let Some(access) = self.repo.find_access(token).await? {
            return Ok(Some(access.client_id));
        }
        Ok(self
            .repo
            .find_refresh(token)
            .await?
            .map(|refresh| refresh.client_id))
    }
}
