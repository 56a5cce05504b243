pub mod client;
pub mod errors;
pub mod grant;
pub mod scope;
