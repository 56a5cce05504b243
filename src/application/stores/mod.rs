// src/application/stores/mod.rs
mod codes;
mod tokens;

pub use codes::CodeStore;
pub use tokens::{TokenLifetimes, TokenStore};
