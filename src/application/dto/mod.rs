pub mod introspection;
pub mod token;

pub use introspection::{TokenIntrospectionDto, TokenOwnerDto};
pub use token::{TokenGrant, TokenResponseDto};
