// src/domain/grant/mod.rs
pub mod entity;
pub mod repository;
pub mod value_objects;

pub use entity::{AccessToken, AuthorizationCode, RefreshToken};
pub use repository::{AuthorizationCodeRepository, TokenRepository};
pub use value_objects::{GrantId, OwnerId};
