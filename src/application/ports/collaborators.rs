// src/application/ports/collaborators.rs
use crate::application::ApplicationResult;
use crate::domain::grant::OwnerId;
use async_trait::async_trait;

/// Resource-owner credential check. Used by the password grant and by the
/// authorize step to identify the owner.
#[async_trait]
pub trait ResourceOwnerAuthenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> ApplicationResult<OwnerId>;
}

/// Trust decision for the assertion grant. Signature and issuer validation
/// live behind this port.
#[async_trait]
pub trait AssertionVerifier: Send + Sync {
    async fn verify_assertion(
        &self,
        assertion_type: &str,
        assertion: &str,
    ) -> ApplicationResult<OwnerId>;
}
