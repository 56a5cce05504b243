// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::{AuthorizationService, GrantPolicy, GrantProcessor, RevocationService},
        ports::{
            collaborators::{AssertionVerifier, ResourceOwnerAuthenticator},
            security::{SecretHasher, TokenGenerator},
            time::Clock,
        },
        queries::TokenQueryService,
        registry::ClientRegistry,
        stores::{CodeStore, TokenLifetimes, TokenStore},
    },
    domain::{
        client::ClientRepository,
        grant::{AuthorizationCodeRepository, TokenRepository},
    },
};
use chrono::Duration;

/// Lifetimes and policy switches shared by the services.
#[derive(Debug, Clone, Copy)]
pub struct ServicePolicy {
    pub code_ttl: Duration,
    pub tokens: TokenLifetimes,
    pub grants: GrantPolicy,
}

impl Default for ServicePolicy {
    fn default() -> Self {
        Self {
            code_ttl: Duration::minutes(10),
            tokens: TokenLifetimes {
                access: Duration::hours(1),
                refresh: Some(Duration::days(30)),
            },
            grants: GrantPolicy::default(),
        }
    }
}

pub struct ApplicationServices {
    pub grants: Arc<GrantProcessor>,
    pub authorization: Arc<AuthorizationService>,
    pub revocation: Arc<RevocationService>,
    pub token_queries: Arc<TokenQueryService>,
    registry: Arc<ClientRegistry>,
    codes: Arc<CodeStore>,
    tokens: Arc<TokenStore>,
    policy: ServicePolicy,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client_repo: Arc<dyn ClientRepository>,
        code_repo: Arc<dyn AuthorizationCodeRepository>,
        token_repo: Arc<dyn TokenRepository>,
        secret_hasher: Arc<dyn SecretHasher>,
        token_generator: Arc<dyn TokenGenerator>,
        authenticator: Arc<dyn ResourceOwnerAuthenticator>,
        assertions: Arc<dyn AssertionVerifier>,
        clock: Arc<dyn Clock>,
        policy: ServicePolicy,
    ) -> Self {
        let registry = Arc::new(ClientRegistry::new(client_repo, secret_hasher));

        let codes = Arc::new(CodeStore::new(
            code_repo,
            Arc::clone(&token_generator),
            Arc::clone(&clock),
            policy.code_ttl,
        ));

        let tokens = Arc::new(TokenStore::new(
            token_repo,
            Arc::clone(&token_generator),
            Arc::clone(&clock),
            policy.tokens,
        ));

        let grants = Arc::new(GrantProcessor::new(
            Arc::clone(&registry),
            Arc::clone(&codes),
            Arc::clone(&tokens),
            Arc::clone(&authenticator),
            assertions,
            policy.grants,
        ));

        let authorization = Arc::new(AuthorizationService::new(
            Arc::clone(&registry),
            Arc::clone(&codes),
            authenticator,
            policy.grants.collaborator_timeout,
        ));

        let revocation = Arc::new(RevocationService::new(
            Arc::clone(&registry),
            Arc::clone(&tokens),
        ));
        let token_queries = Arc::new(TokenQueryService::new(Arc::clone(&tokens)));

        Self {
            grants,
            authorization,
            revocation,
            token_queries,
            registry,
            codes,
            tokens,
            policy,
        }
    }

    pub fn registry(&self) -> Arc<ClientRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn code_store(&self) -> Arc<CodeStore> {
        Arc::clone(&self.codes)
    }

    pub fn token_store(&self) -> Arc<TokenStore> {
        Arc::clone(&self.tokens)
    }

    pub fn policy(&self) -> ServicePolicy {
        self.policy
    }
}
