// src/application/error.rs
use crate::domain::errors::DomainError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid client: {0}")]
    InvalidClient(String),

    #[error("unauthorized client: {0}")]
    UnauthorizedClient(String),

    #[error("invalid grant: {0}")]
    InvalidGrant(String),

    #[error("invalid scope: {0}")]
    InvalidScope(String),

    #[error("redirect uri mismatch: {0}")]
    RedirectMismatch(String),

    #[error("client mismatch: {0}")]
    ClientMismatch(String),

    #[error("unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    #[error("unsupported response type: {0}")]
    UnsupportedResponseType(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn invalid_client(msg: impl Into<String>) -> Self {
        Self::InvalidClient(msg.into())
    }

    pub fn unauthorized_client(msg: impl Into<String>) -> Self {
        Self::UnauthorizedClient(msg.into())
    }

    pub fn invalid_grant(msg: impl Into<String>) -> Self {
        Self::InvalidGrant(msg.into())
    }

    pub fn invalid_scope(msg: impl Into<String>) -> Self {
        Self::InvalidScope(msg.into())
    }

    pub fn redirect_mismatch(msg: impl Into<String>) -> Self {
        Self::RedirectMismatch(msg.into())
    }

    pub fn client_mismatch(msg: impl Into<String>) -> Self {
        Self::ClientMismatch(msg.into())
    }

    pub fn unsupported_grant_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedGrantType(msg.into())
    }

    pub fn unsupported_response_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedResponseType(msg.into())
    }

    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// The RFC 6749 error code reported to clients.
    ///
    /// Redirect and client mismatches during a code exchange are grant
    /// failures from the client's point of view.
    pub fn oauth_code(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::Validation(_)) | Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidClient(_) | Self::NotFound(_) => "invalid_client",
            Self::UnauthorizedClient(_) => "unauthorized_client",
            Self::InvalidGrant(_) | Self::RedirectMismatch(_) | Self::ClientMismatch(_) => {
                "invalid_grant"
            }
            Self::InvalidScope(_) => "invalid_scope",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::UnsupportedResponseType(_) => "unsupported_response_type",
            Self::AccessDenied(_) => "access_denied",
            Self::Domain(DomainError::Persistence(_)) | Self::Infrastructure(_) => "server_error",
        }
    }

    /// Human-readable detail for `error_description`. Infrastructure detail
    /// is never exposed.
    pub fn description(&self) -> String {
        match self {
            Self::Domain(DomainError::Validation(msg)) => msg.clone(),
            Self::Domain(DomainError::Persistence(_)) | Self::Infrastructure(_) => {
                "internal server error".to_string()
            }
            Self::InvalidRequest(msg)
            | Self::InvalidClient(msg)
            | Self::UnauthorizedClient(msg)
            | Self::InvalidGrant(msg)
            | Self::InvalidScope(msg)
            | Self::RedirectMismatch(msg)
            | Self::ClientMismatch(msg)
            | Self::UnsupportedGrantType(msg)
            | Self::UnsupportedResponseType(msg)
            | Self::AccessDenied(msg)
            | Self::NotFound(msg) => msg.clone(),
        }
    }

    /// Storage and other infrastructure failures, as opposed to protocol errors.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Infrastructure(_) | Self::Domain(DomainError::Persistence(_))
        )
    }
}
