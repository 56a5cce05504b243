// src/infrastructure/security/secret_hasher.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::SecretHasher,
};
use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
};
use async_trait::async_trait;
use rand::RngCore;

/// Argon2id hashing for client secrets and resource-owner passwords. Work
/// runs on the blocking pool.
#[derive(Default, Clone)]
pub struct Argon2SecretHasher;

#[async_trait]
impl SecretHasher for Argon2SecretHasher {
    async fn hash(&self, secret: &str) -> ApplicationResult<String> {
        let secret = secret.to_owned();
        tokio::task::spawn_blocking(move || -> ApplicationResult<String> {
            let mut salt_bytes = [0u8; 16];
            rand::rng().fill_bytes(&mut salt_bytes);
            let salt = SaltString::encode_b64(&salt_bytes)
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
            Argon2::default()
                .hash_password(secret.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))
        })
        .await
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
    }

    async fn verify(&self, secret: &str, expected_hash: &str) -> ApplicationResult<bool> {
        let secret = secret.to_owned();
        let expected_hash = expected_hash.to_owned();
        tokio::task::spawn_blocking(move || -> ApplicationResult<bool> {
            let parsed = PasswordHash::new(&expected_hash)
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
            match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(err) => Err(ApplicationError::infrastructure(err.to_string())),
            }
        })
        .await
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
    }
}
