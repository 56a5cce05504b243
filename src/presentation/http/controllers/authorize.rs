// src/presentation/http/controllers/authorize.rs
use crate::application::{
    commands::{AuthorizationRequest, AuthorizationService, AuthorizeCommand, AuthorizeError},
    error::ApplicationError,
};
use crate::presentation::http::error::{ErrorResponse, HttpError, HttpResult};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Form,
    extract::{
        Query,
        rejection::{FormRejection, QueryRejection},
    },
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuthorizeParams {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: Option<String>,
    pub state: Option<String>,
}

/// Authorize parameters plus the resource owner's credentials.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AuthorizeForm {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: Option<String>,
    pub state: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl From<AuthorizeParams> for AuthorizeCommand {
    fn from(params: AuthorizeParams) -> Self {
        Self {
            response_type: params.response_type,
            client_id: params.client_id,
            redirect_uri: params.redirect_uri,
            scope: params.scope,
            state: params.state,
        }
    }
}

impl AuthorizeForm {
    fn split(self) -> (AuthorizeCommand, Option<(String, String)>) {
        let credentials = match (self.username, self.password) {
            (Some(username), Some(password)) if !username.is_empty() => Some((username, password)),
            _ => None,
        };
        let command = AuthorizeCommand {
            response_type: self.response_type,
            client_id: self.client_id,
            redirect_uri: self.redirect_uri,
            scope: self.scope,
            state: self.state,
        };
        (command, credentials)
    }
}

fn rejected(err: AuthorizeError) -> Response {
    match err {
        AuthorizeError::Direct(err) => {
            tracing::warn!(error = err.oauth_code(), detail = %err, "authorize request rejected");
            HttpError::from_error(err).into_response()
        }
        AuthorizeError::Redirect { location, error } => {
            tracing::info!(error = error.oauth_code(), "authorize request redirected with error");
            Redirect::to(&location).into_response()
        }
    }
}

fn redirect_with_error(
    service: &AuthorizationService,
    request: &AuthorizationRequest,
    err: ApplicationError,
) -> HttpResult<Response> {
    if err.is_infrastructure() {
        tracing::error!(client_id = %request.client.id, error = %err, "authorization failed");
    }
    let location = service.error_redirect(request, &err)?;
    Ok(Redirect::to(&location).into_response())
}

#[utoipa::path(
    get,
    path = "/authorize",
    params(AuthorizeParams),
    responses(
        (status = 303, description = "Error redirect to the client"),
        (status = 400, description = "Client or redirect URI cannot be trusted", body = ErrorResponse),
        (status = 401, description = "Request is valid; resource owner must sign in", body = ErrorResponse)
    ),
    security([]),
    tag = "OAuth2"
)]
pub async fn authorize(
    Extension(state): Extension<HttpState>,
    query: Result<Query<AuthorizeParams>, QueryRejection>,
) -> HttpResult<Response> {
    let Query(params) = query
        .map_err(|rejection| ApplicationError::invalid_request(rejection.body_text()))?;

    match state.services.authorization.validate(params.into()).await {
        Ok(_) => Err(HttpError::login_required()),
        Err(err) => Ok(rejected(err)),
    }
}

#[utoipa::path(
    post,
    path = "/authorize",
    request_body(content = AuthorizeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the client with a code or an error"),
        (status = 400, description = "Client or redirect URI cannot be trusted", body = ErrorResponse),
        (status = 401, description = "Resource owner credentials missing", body = ErrorResponse)
    ),
    security([]),
    tag = "OAuth2"
)]
pub async fn authorize_submit(
    Extension(state): Extension<HttpState>,
    form: Result<Form<AuthorizeForm>, FormRejection>,
) -> HttpResult<Response> {
    let Form(form) =
        form.map_err(|rejection| ApplicationError::invalid_request(rejection.body_text()))?;
    let (command, credentials) = form.split();
    let service = state.services.authorization.as_ref();

    let request = match service.validate(command).await {
        Ok(request) => request,
        Err(err) => return Ok(rejected(err)),
    };

    let Some((username, password)) = credentials else {
        return Err(HttpError::login_required());
    };

    let owner = match service.authenticate_owner(&username, &password).await {
        Ok(owner) => owner,
        Err(err) => return redirect_with_error(service, &request, err),
    };

    match service.approve(&request, &owner).await {
        Ok(grant) => Ok(Redirect::to(&grant.location).into_response()),
        Err(err) => redirect_with_error(service, &request, err),
    }
}
