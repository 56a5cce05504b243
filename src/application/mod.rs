pub mod commands;
pub mod dto;
pub mod error;
pub mod ports;
pub mod queries;
pub mod registry;
pub mod scope;
pub mod services;
pub mod stores;

pub use error::ApplicationResult;
