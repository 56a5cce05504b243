// src/presentation/http/controllers/token.rs
use crate::application::{
    commands::{
        AssertionGrant, AuthorizationCodeGrant, ClientCredentialsGrant, GrantRequest,
        PasswordGrant, RefreshTokenGrant,
    },
    dto::TokenResponseDto,
    error::{ApplicationError, ApplicationResult},
    registry::ClientCredentials,
    scope::ScopeValidator,
};
use crate::domain::client::GrantType;
use crate::presentation::http::error::{ErrorResponse, HttpError, HttpResult};
use crate::presentation::http::extractors::BasicClientAuth;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Form, Json,
    extract::rejection::FormRejection,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::ToSchema;

/// Token endpoint form body. Which fields are required depends on `grant_type`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub assertion_type: Option<String>,
    pub assertion: Option<String>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

fn required(value: Option<String>, name: &str) -> ApplicationResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApplicationError::invalid_request(format!("{name} is required")))
}

impl TokenRequest {
    /// Build the typed grant request. Unknown grant types and missing
    /// per-grant fields fail here, before any client lookup.
    pub fn into_grant(self, client: ClientCredentials) -> ApplicationResult<GrantRequest> {
        let grant_type: GrantType = required(self.grant_type, "grant_type")?
            .parse()
            .map_err(|_| ApplicationError::unsupported_grant_type("grant_type is not supported"))?;
        let scope = ScopeValidator.parse(self.scope.as_deref())?;

        let request = match grant_type {
            GrantType::AuthorizationCode => GrantRequest::AuthorizationCode(AuthorizationCodeGrant {
                client,
                code: required(self.code, "code")?,
                redirect_uri: required(self.redirect_uri, "redirect_uri")?,
            }),
            GrantType::Password => GrantRequest::Password(PasswordGrant {
                client,
                username: required(self.username, "username")?,
                password: required(self.password, "password")?,
                scope,
            }),
            GrantType::ClientCredentials => {
                GrantRequest::ClientCredentials(ClientCredentialsGrant { client, scope })
            }
            GrantType::Assertion => GrantRequest::Assertion(AssertionGrant {
                client,
                assertion_type: required(self.assertion_type, "assertion_type")?,
                assertion: required(self.assertion, "assertion")?,
                scope,
            }),
            GrantType::RefreshToken => GrantRequest::RefreshToken(RefreshTokenGrant {
                client,
                refresh_token: required(self.refresh_token, "refresh_token")?,
                scope,
            }),
        };
        Ok(request)
    }
}

#[utoipa::path(
    post,
    path = "/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Tokens issued", body = TokenResponseDto),
        (status = 400, description = "Request rejected", body = ErrorResponse),
        (status = 401, description = "Client authentication failed", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("basicAuth" = [])),
    tag = "OAuth2"
)]
pub async fn token(
    Extension(state): Extension<HttpState>,
    basic: BasicClientAuth,
    form: Result<Form<TokenRequest>, FormRejection>,
) -> HttpResult<Response> {
    let used_basic = basic.0.is_some();
    let reject = |err: ApplicationError| HttpError::from_token_error(err).with_basic_challenge(used_basic);

    let Form(form) = form.map_err(|rejection| {
        reject(ApplicationError::invalid_request(rejection.body_text()))
    })?;

    let client = basic
        .resolve(form.client_id.as_deref(), form.client_secret.as_deref())
        .map_err(reject)?;
    let request = form.into_grant(client).map_err(reject)?;

    let grant = state.services.grants.process(request).await.map_err(reject)?;

    Ok(no_store(Json(TokenResponseDto::from(grant))))
}

pub(crate) fn no_store(body: impl IntoResponse) -> Response {
    (
        [
            (header::CACHE_CONTROL, "no-store"),
            (header::PRAGMA, "no-cache"),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> ClientCredentials {
        ClientCredentials::new("c1", Some("s1".into()))
    }

    #[test]
    fn unknown_grant_type_is_unsupported() {
        let form = TokenRequest {
            grant_type: Some("implicit".into()),
            ..Default::default()
        };
        assert!(matches!(
            form.into_grant(creds()),
            Err(ApplicationError::UnsupportedGrantType(_))
        ));
    }

    #[test]
    fn missing_grant_fields_are_invalid_requests() {
        let form = TokenRequest {
            grant_type: Some("authorization_code".into()),
            code: Some("abc".into()),
            ..Default::default()
        };
        let err = form.into_grant(creds()).unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidRequest(ref msg) if msg.contains("redirect_uri")));
    }

    #[test]
    fn missing_grant_type_is_an_invalid_request() {
        assert!(matches!(
            TokenRequest::default().into_grant(creds()),
            Err(ApplicationError::InvalidRequest(_))
        ));
    }

    #[test]
    fn refresh_request_carries_parsed_scope() {
        let form = TokenRequest {
            grant_type: Some("refresh_token".into()),
            refresh_token: Some("rt".into()),
            scope: Some("write read".into()),
            ..Default::default()
        };
        match form.into_grant(creds()).unwrap() {
            GrantRequest::RefreshToken(grant) => assert_eq!(grant.scope.to_string(), "read write"),
            other => panic!("unexpected grant {other:?}"),
        }
    }
}
