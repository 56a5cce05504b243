// src/application/commands/grants/mod.rs
//! Grant dispatch for the token endpoint.
//!
//! Each grant type is one variant of [`GrantRequest`] carrying its own
//! parameters; [`GrantProcessor::process`] is the single entry point. Every
//! flow either returns a [`TokenGrant`] or the first violated condition.

mod assertion;
mod authorization_code;
mod client_credentials;
mod password;
mod refresh;

use crate::application::{
    dto::TokenGrant,
    error::{ApplicationError, ApplicationResult},
    ports::collaborators::{AssertionVerifier, ResourceOwnerAuthenticator},
    registry::{ClientCredentials, ClientRegistry},
    scope::ScopeValidator,
    stores::{CodeStore, TokenStore},
};
use crate::domain::client::{Client, GrantType};
use crate::domain::grant::{GrantId, OwnerId};
use crate::domain::scope::ScopeSet;
use std::{future::Future, sync::Arc, time::Duration};

#[derive(Debug, Clone)]
pub struct AuthorizationCodeGrant {
    pub client: ClientCredentials,
    pub code: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct PasswordGrant {
    pub client: ClientCredentials,
    pub username: String,
    pub password: String,
    pub scope: ScopeSet,
}

#[derive(Debug, Clone)]
pub struct ClientCredentialsGrant {
    pub client: ClientCredentials,
    pub scope: ScopeSet,
}

#[derive(Debug, Clone)]
pub struct AssertionGrant {
    pub client: ClientCredentials,
    pub assertion_type: String,
    pub assertion: String,
    pub scope: ScopeSet,
}

#[derive(Debug, Clone)]
pub struct RefreshTokenGrant {
    pub client: ClientCredentials,
    pub refresh_token: String,
    pub scope: ScopeSet,
}

#[derive(Debug, Clone)]
pub enum GrantRequest {
    AuthorizationCode(AuthorizationCodeGrant),
    Password(PasswordGrant),
    ClientCredentials(ClientCredentialsGrant),
    Assertion(AssertionGrant),
    RefreshToken(RefreshTokenGrant),
}

impl GrantRequest {
    pub fn grant_type(&self) -> GrantType {
        match self {
            Self::AuthorizationCode(_) => GrantType::AuthorizationCode,
            Self::Password(_) => GrantType::Password,
            Self::ClientCredentials(_) => GrantType::ClientCredentials,
            Self::Assertion(_) => GrantType::Assertion,
            Self::RefreshToken(_) => GrantType::RefreshToken,
        }
    }

    pub fn client(&self) -> &ClientCredentials {
        match self {
            Self::AuthorizationCode(grant) => &grant.client,
            Self::Password(grant) => &grant.client,
            Self::ClientCredentials(grant) => &grant.client,
            Self::Assertion(grant) => &grant.client,
            Self::RefreshToken(grant) => &grant.client,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GrantPolicy {
    /// Replace the refresh token on every use instead of handing the same one back.
    pub rotate_refresh_tokens: bool,
    /// Upper bound on credential and assertion checks.
    pub collaborator_timeout: Duration,
}

impl Default for GrantPolicy {
    fn default() -> Self {
        Self {
            rotate_refresh_tokens: true,
            collaborator_timeout: Duration::from_secs(5),
        }
    }
}

pub struct GrantProcessor {
    registry: Arc<ClientRegistry>,
    codes: Arc<CodeStore>,
    tokens: Arc<TokenStore>,
    authenticator: Arc<dyn ResourceOwnerAuthenticator>,
    assertions: Arc<dyn AssertionVerifier>,
    scopes: ScopeValidator,
    policy: GrantPolicy,
}

impl GrantProcessor {
    pub fn new(
        registry: Arc<ClientRegistry>,
        codes: Arc<CodeStore>,
        tokens: Arc<TokenStore>,
        authenticator: Arc<dyn ResourceOwnerAuthenticator>,
        assertions: Arc<dyn AssertionVerifier>,
        policy: GrantPolicy,
    ) -> Self {
        Self {
            registry,
            codes,
            tokens,
            authenticator,
            assertions,
            scopes: ScopeValidator,
            policy,
        }
    }

    pub async fn process(&self, request: GrantRequest) -> ApplicationResult<TokenGrant> {
        let grant_type = request.grant_type();
        let client_id = request.client().client_id.clone();

        let result = match request {
            GrantRequest::AuthorizationCode(grant) => self.exchange_authorization_code(grant).await,
            GrantRequest::Password(grant) => self.exchange_password(grant).await,
            GrantRequest::ClientCredentials(grant) => self.exchange_client_credentials(grant).await,
            GrantRequest::Assertion(grant) => self.exchange_assertion(grant).await,
            GrantRequest::RefreshToken(grant) => self.exchange_refresh_token(grant).await,
        };

        match &result {
            Ok(grant) => tracing::info!(
                %grant_type,
                %client_id,
                scope = %grant.scope,
                refresh = grant.refresh_token.is_some(),
                "token issued"
            ),
            Err(err) if err.is_infrastructure() => {
                tracing::error!(%grant_type, %client_id, error = %err, "grant failed")
            }
            Err(err) => tracing::warn!(
                %grant_type,
                %client_id,
                error = err.oauth_code(),
                detail = %err,
                "grant rejected"
            ),
        }

        result
    }

    async fn authenticate_client(
        &self,
        credentials: &ClientCredentials,
        grant: GrantType,
    ) -> ApplicationResult<Client> {
        self.registry.authenticate_request(credentials, Some(grant)).await
    }

    /// Mint an access token, plus a refresh token when `with_refresh` holds
    /// and there is a resource owner to refresh on behalf of.
    async fn issue_tokens(
        &self,
        client: &Client,
        owner_id: Option<&OwnerId>,
        scope: ScopeSet,
        requested_scope: ScopeSet,
        with_refresh: bool,
    ) -> ApplicationResult<TokenGrant> {
        let grant_id = GrantId::generate();

        let refresh_token = match owner_id {
            Some(owner) if with_refresh => Some(
                self.tokens
                    .issue_refresh_token(client, owner, &scope, grant_id)
                    .await?,
            ),
            _ => None,
        };

        let access_token = self
            .tokens
            .issue_access_token(client, owner_id, &scope, grant_id, refresh_token.as_ref())
            .await?;

        Ok(TokenGrant {
            access_token,
            refresh_token,
            scope,
            requested_scope,
        })
    }

    /// Run an external collaborator under the configured timeout. Rejections
    /// and timeouts both become `InvalidGrant`; nothing is retried.
    async fn call_collaborator<F>(&self, what: &'static str, call: F) -> ApplicationResult<OwnerId>
    where
        F: Future<Output = ApplicationResult<OwnerId>>,
    {
        match tokio::time::timeout(self.policy.collaborator_timeout, call).await {
            Ok(Ok(owner)) => Ok(owner),
            Ok(Err(err)) => {
                tracing::debug!(collaborator = what, error = %err, "collaborator rejected request");
                Err(ApplicationError::invalid_grant(format!("{what} failed")))
            }
            Err(_) => {
                tracing::warn!(collaborator = what, "collaborator timed out");
                Err(ApplicationError::invalid_grant(format!("{what} timed out")))
            }
        }
    }
}

fn refresh_allowed(client: &Client) -> bool {
    client.allows_grant(GrantType::RefreshToken)
}
