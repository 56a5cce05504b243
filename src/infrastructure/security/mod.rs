// src/infrastructure/security/mod.rs
pub mod assertion;
pub mod owner_directory;
pub mod secret_hasher;
pub mod token_generator;

pub use assertion::{HMAC_ASSERTION_TYPE, HmacAssertionVerifier, RejectingAssertionVerifier};
pub use owner_directory::{ResourceOwnerRecord, StaticResourceOwnerDirectory};
pub use secret_hasher::Argon2SecretHasher;
pub use token_generator::RandomTokenGenerator;
