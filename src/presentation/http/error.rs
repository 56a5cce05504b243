// src/presentation/http/error.rs
use crate::application::{ApplicationResult, error::ApplicationError};
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// RFC 6749 error body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    body: ErrorResponse,
    basic_challenge: bool,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        if err.is_infrastructure() {
            tracing::error!(error = %err, "request failed on infrastructure error");
        }

        let status = match &err {
            ApplicationError::InvalidClient(_) => StatusCode::UNAUTHORIZED,
            ApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
            err if err.is_infrastructure() => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };

        let error = match &err {
            // lookups outside the token flow report their own code
            ApplicationError::NotFound(_) => "not_found",
            other => other.oauth_code(),
        };

        Self {
            status,
            body: ErrorResponse {
                error: error.to_string(),
                error_description: Some(err.description()),
            },
            basic_challenge: false,
        }
    }

    /// Token-endpoint errors: unknown clients surface as `invalid_client`.
    pub fn from_token_error(err: ApplicationError) -> Self {
        match err {
            ApplicationError::NotFound(msg) => Self::from_error(ApplicationError::InvalidClient(msg)),
            other => Self::from_error(other),
        }
    }

    /// `401 login_required`: the authorize request is valid but nobody is signed in.
    pub fn login_required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: ErrorResponse {
                error: "login_required".into(),
                error_description: Some(
                    "resource owner credentials are required to continue".into(),
                ),
            },
            basic_challenge: false,
        }
    }

    /// Ask the client to retry with HTTP Basic. Only applies to `401` responses.
    pub fn with_basic_challenge(mut self, enabled: bool) -> Self {
        self.basic_challenge = enabled && self.status == StatusCode::UNAUTHORIZED;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.body.error
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        if self.basic_challenge {
            headers.insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"warden\""),
            );
        }
        response
    }
}

impl From<ApplicationError> for HttpError {
    fn from(err: ApplicationError) -> Self {
        Self::from_error(err)
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;

    #[test]
    fn status_follows_the_error_class() {
        let cases = [
            (ApplicationError::invalid_client("x"), StatusCode::UNAUTHORIZED, "invalid_client"),
            (ApplicationError::invalid_grant("x"), StatusCode::BAD_REQUEST, "invalid_grant"),
            (ApplicationError::redirect_mismatch("x"), StatusCode::BAD_REQUEST, "invalid_grant"),
            (ApplicationError::invalid_scope("x"), StatusCode::BAD_REQUEST, "invalid_scope"),
            (ApplicationError::not_found("x"), StatusCode::NOT_FOUND, "not_found"),
            (
                ApplicationError::from(DomainError::persistence("down")),
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
            ),
        ];
        for (err, status, code) in cases {
            let http = HttpError::from_error(err);
            assert_eq!(http.status(), status);
            assert_eq!(http.code(), code);
        }
    }

    #[test]
    fn token_errors_report_unknown_clients_as_invalid_client() {
        let http = HttpError::from_token_error(ApplicationError::not_found("unknown client"));
        assert_eq!(http.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(http.code(), "invalid_client");
    }

    #[test]
    fn basic_challenge_only_on_unauthorized() {
        let response = HttpError::from_error(ApplicationError::invalid_client("bad secret"))
            .with_basic_challenge(true)
            .into_response();
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");

        let response = HttpError::from_error(ApplicationError::invalid_grant("x"))
            .with_basic_challenge(true)
            .into_response();
        assert!(!response.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}
