// tests/support/mocks/security.rs
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use warden_core::application::{
    ApplicationResult,
    ports::security::{SecretHasher, TokenGenerator},
};

/* -------------------------------- SecretHasher -------------------------------- */

/// Reversible "hash" so fixtures can be written by hand. Never use outside tests.
#[derive(Clone, Debug, Default)]
pub struct PlainSecretHasher;

impl PlainSecretHasher {
    pub fn hash_of(secret: &str) -> String {
        format!("plain:{secret}")
    }
}

#[async_trait]
impl SecretHasher for PlainSecretHasher {
    async fn hash(&self, secret: &str) -> ApplicationResult<String> {
        Ok(Self::hash_of(secret))
    }

    async fn verify(&self, secret: &str, expected_hash: &str) -> ApplicationResult<bool> {
        Ok(expected_hash == Self::hash_of(secret))
    }
}

/* -------------------------------- TokenGenerator -------------------------------- */

/// Deterministic, never-repeating token strings.
#[derive(Debug, Default)]
pub struct SequentialTokenGenerator {
    next: AtomicU64,
}

impl TokenGenerator for SequentialTokenGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("tok-{n:04}")
    }
}
