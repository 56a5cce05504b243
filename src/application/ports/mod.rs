// src/application/ports/mod.rs
pub mod collaborators;
pub mod security;
pub mod time;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type SecretHasherPort = dyn security::SecretHasher;
pub type TokenGeneratorPort = dyn security::TokenGenerator;
pub type ClockPort = dyn time::Clock;
pub type OwnerAuthenticatorPort = dyn collaborators::ResourceOwnerAuthenticator;
pub type AssertionVerifierPort = dyn collaborators::AssertionVerifier;
