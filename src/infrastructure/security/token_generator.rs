// src/infrastructure/security/token_generator.rs
use crate::application::ports::security::TokenGenerator;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

const TOKEN_BYTES: usize = 32;

/// 256 random bits from the thread-local CSPRNG, base64url encoded.
#[derive(Default, Clone)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
