// tests/support/mocks/collaborators.rs
use async_trait::async_trait;
use std::time::Duration;
use warden_core::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::collaborators::{AssertionVerifier, ResourceOwnerAuthenticator},
};
use warden_core::domain::grant::OwnerId;

pub const TEST_ASSERTION_TYPE: &str = "urn:test:assertion";

/// Knows `alice`/`wonderland` (owner `owner-alice`) and `bob`/`builder`
/// (owner `owner-bob`).
#[derive(Clone, Debug, Default)]
pub struct StaticOwnerAuthenticator;

#[async_trait]
impl ResourceOwnerAuthenticator for StaticOwnerAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> ApplicationResult<OwnerId> {
        match (username, password) {
            ("alice", "wonderland") | ("bob", "builder") => Ok(OwnerId::new(format!("owner-{username}"))?),
            _ => Err(ApplicationError::access_denied("bad credentials")),
        }
    }
}

/// Never answers within any sane timeout.
#[derive(Clone, Debug, Default)]
pub struct SlowOwnerAuthenticator;

#[async_trait]
impl ResourceOwnerAuthenticator for SlowOwnerAuthenticator {
    async fn authenticate(&self, _username: &str, _password: &str) -> ApplicationResult<OwnerId> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(OwnerId::new("too-late")?)
    }
}

/// Accepts `valid:<owner>` assertions of [`TEST_ASSERTION_TYPE`].
#[derive(Clone, Debug, Default)]
pub struct StaticAssertionVerifier;

#[async_trait]
impl AssertionVerifier for StaticAssertionVerifier {
    async fn verify_assertion(
        &self,
        assertion_type: &str,
        assertion: &str,
    ) -> ApplicationResult<OwnerId> {
        if assertion_type != TEST_ASSERTION_TYPE {
            return Err(ApplicationError::invalid_grant("unknown assertion type"));
        }
        match assertion.strip_prefix("valid:") {
            Some(owner) => Ok(OwnerId::new(owner)?),
            None => Err(ApplicationError::invalid_grant("untrusted assertion")),
        }
    }
}
