// src/infrastructure/repositories/mod.rs
mod clients;
mod error;
mod memory;
mod redis_store;

pub use clients::{ClientRegistration, InMemoryClientRepository};
pub use memory::{InMemoryAuthorizationCodeRepository, InMemoryTokenRepository};
pub use redis_store::{RedisAuthorizationCodeRepository, RedisStore, RedisTokenRepository};
