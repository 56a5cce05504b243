// src/presentation/http/controllers/token_info.rs
use crate::application::{
    commands::RevokeTokenCommand,
    dto::{TokenIntrospectionDto, TokenOwnerDto},
    error::ApplicationError,
};
use crate::presentation::http::controllers::token::no_store;
use crate::presentation::http::error::{ErrorResponse, HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::BasicClientAuth;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Form, Json,
    extract::{Path, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TokenInfoRequest {
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RevokeRequest {
    pub token: Option<String>,
    /// Accepted for RFC 7009 compatibility; lookup covers both token kinds.
    pub token_type_hint: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[utoipa::path(
    post,
    path = "/info",
    request_body(content = TokenInfoRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token state", body = TokenIntrospectionDto),
        (status = 400, description = "Missing token", body = ErrorResponse)
    ),
    security([]),
    tag = "OAuth2"
)]
pub async fn token_info(
    Extension(state): Extension<HttpState>,
    form: Result<Form<TokenInfoRequest>, FormRejection>,
) -> HttpResult<Response> {
    let Form(form) =
        form.map_err(|rejection| ApplicationError::invalid_request(rejection.body_text()))?;
    let token = form
        .token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApplicationError::invalid_request("token is required"))?;

    let info = state
        .services
        .token_queries
        .introspect(&token)
        .await
        .into_http()?;
    Ok(no_store(Json(info)))
}

#[utoipa::path(
    get,
    path = "/internal/access-tokens/{token}/owner",
    params(("token" = String, Path, description = "Access token value")),
    responses(
        (status = 200, description = "Resource owner of the token", body = TokenOwnerDto),
        (status = 404, description = "Token invalid or has no owner", body = ErrorResponse)
    ),
    security([]),
    tag = "Internal"
)]
pub async fn access_token_owner(
    Extension(state): Extension<HttpState>,
    Path(token): Path<String>,
) -> HttpResult<Json<TokenOwnerDto>> {
    let owner = state
        .services
        .token_queries
        .owner_of(&token)
        .await
        .into_http()?;
    Ok(Json(owner))
}

#[utoipa::path(
    post,
    path = "/revoke",
    request_body(content = RevokeRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token revoked, or it was unknown"),
        (status = 400, description = "Request rejected", body = ErrorResponse),
        (status = 401, description = "Client authentication failed", body = ErrorResponse)
    ),
    security(("basicAuth" = [])),
    tag = "OAuth2"
)]
pub async fn revoke(
    Extension(state): Extension<HttpState>,
    basic: BasicClientAuth,
    form: Result<Form<RevokeRequest>, FormRejection>,
) -> HttpResult<Response> {
    let used_basic = basic.0.is_some();
    let reject = |err: ApplicationError| HttpError::from_token_error(err).with_basic_challenge(used_basic);

    let Form(form) = form
        .map_err(|rejection| reject(ApplicationError::invalid_request(rejection.body_text())))?;
    let client = basic
        .resolve(form.client_id.as_deref(), form.client_secret.as_deref())
        .map_err(reject)?;

    state
        .services
        .revocation
        .revoke(RevokeTokenCommand {
            client,
            token: form.token.unwrap_or_default(),
        })
        .await
        .map_err(reject)?;

    Ok(StatusCode::OK.into_response())
}
