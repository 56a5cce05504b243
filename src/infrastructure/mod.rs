// src/infrastructure/mod.rs
pub mod repositories;
pub mod security;
pub mod time;
