// src/application/ports/security.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;

#[async_trait]
pub trait SecretHasher: Send + Sync {
    async fn hash(&self, secret: &str) -> ApplicationResult<String>;
    /// `Ok(false)` on mismatch; errors are reserved for malformed hashes and
    /// runtime failures.
    async fn verify(&self, secret: &str, expected_hash: &str) -> ApplicationResult<bool>;
}

/// Source of opaque code and token strings. Implementations must draw from a
/// cryptographically secure generator with at least 128 bits of entropy.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}
