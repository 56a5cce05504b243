pub mod authorize;
pub mod grants;
pub mod revoke;

pub use authorize::{
    AuthorizationGrant, AuthorizationRequest, AuthorizationService, AuthorizeCommand,
    AuthorizeError,
};
pub use grants::{
    AssertionGrant, AuthorizationCodeGrant, ClientCredentialsGrant, GrantPolicy, GrantProcessor,
    GrantRequest, PasswordGrant, RefreshTokenGrant,
};
pub use revoke::{RevocationService, RevokeTokenCommand};
