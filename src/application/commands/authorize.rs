// src/application/commands/authorize.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::collaborators::ResourceOwnerAuthenticator,
    registry::ClientRegistry,
    scope::ScopeValidator,
    stores::CodeStore,
};
use crate::domain::client::{Client, GrantType};
use crate::domain::grant::{AuthorizationCode, OwnerId};
use crate::domain::scope::ScopeSet;
use std::{sync::Arc, time::Duration};
use url::Url;

/// Raw authorize parameters as received.
#[derive(Debug, Clone, Default)]
pub struct AuthorizeCommand {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: Option<String>,
    pub state: Option<String>,
}

/// An authorize request that passed client, redirect and scope checks.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub client: Client,
    pub redirect_uri: String,
    pub scope: ScopeSet,
    pub state: Option<String>,
}

/// Successful authorize step: where to send the user agent.
#[derive(Debug, Clone)]
pub struct AuthorizationGrant {
    pub code: AuthorizationCode,
    pub location: String,
}

#[derive(Debug)]
pub enum AuthorizeError {
    /// The client or redirect URI could not be trusted: report to the user
    /// agent directly, never redirect.
    Direct(ApplicationError),
    /// Report through the client's redirect URI.
    Redirect {
        location: String,
        error: ApplicationError,
    },
}

pub struct AuthorizationService {
    registry: Arc<ClientRegistry>,
    codes: Arc<CodeStore>,
    authenticator: Arc<dyn ResourceOwnerAuthenticator>,
    scopes: ScopeValidator,
    login_timeout: Duration,
}

impl AuthorizationService {
    pub fn new(
        registry: Arc<ClientRegistry>,
        codes: Arc<CodeStore>,
        authenticator: Arc<dyn ResourceOwnerAuthenticator>,
        login_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            codes,
            authenticator,
            scopes: ScopeValidator,
            login_timeout,
        }
    }

    pub async fn validate(
        &self,
        command: AuthorizeCommand,
    ) -> Result<AuthorizationRequest, AuthorizeError> {
        let client_id = command
            .client_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AuthorizeError::Direct(ApplicationError::invalid_request("client_id is required")))?;

        let client = match self.registry.lookup(client_id).await {
            Ok(client) => client,
            Err(ApplicationError::NotFound(_)) => {
                return Err(AuthorizeError::Direct(ApplicationError::invalid_client(
                    "unknown client",
                )));
            }
            Err(err) => return Err(AuthorizeError::Direct(err)),
        };

        let redirect_uri = match command.redirect_uri.as_deref().filter(|uri| !uri.is_empty()) {
            Some(uri) if client.has_redirect_uri(uri) => uri.to_string(),
            Some(_) => {
                return Err(AuthorizeError::Direct(ApplicationError::invalid_request(
                    "redirect_uri is not registered for this client",
                )));
            }
            None => client
                .default_redirect_uri()
                .map(str::to_string)
                .ok_or_else(|| {
                    AuthorizeError::Direct(ApplicationError::invalid_request(
                        "redirect_uri is required",
                    ))
                })?,
        };

        let state = command.state.clone();
        let redirect_error = |error: ApplicationError| match error_location(&redirect_uri, &error, state.as_deref()) {
            Ok(location) => AuthorizeError::Redirect { location, error },
            Err(err) => AuthorizeError::Direct(err),
        };

        match command.response_type.as_deref() {
            Some("code") => {}
            Some(other) => {
                return Err(redirect_error(ApplicationError::unsupported_response_type(format!(
                    "response_type '{other}' is not supported"
                ))));
            }
            None => {
                return Err(redirect_error(ApplicationError::invalid_request(
                    "response_type is required",
                )));
            }
        }

        if !client.allows_grant(GrantType::AuthorizationCode) {
            return Err(redirect_error(ApplicationError::unauthorized_client(
                "client is not permitted to use the authorization_code grant",
            )));
        }

        let requested = self
            .scopes
            .parse(command.scope.as_deref())
            .map_err(redirect_error)?;
        let scope = self
            .scopes
            .validate(&requested, &client.allowed_scopes)
            .map_err(redirect_error)?;

        Ok(AuthorizationRequest {
            client,
            redirect_uri,
            scope,
            state: command.state,
        })
    }

    /// Identify the resource owner. Any failure is `AccessDenied`.
    pub async fn authenticate_owner(&self, username: &str, password: &str) -> ApplicationResult<OwnerId> {
        match tokio::time::timeout(
            self.login_timeout,
            self.authenticator.authenticate(username, password),
        )
        .await
        {
            Ok(Ok(owner)) => Ok(owner),
            Ok(Err(err)) => {
                tracing::debug!(error = %err, "resource owner login rejected");
                Err(ApplicationError::access_denied("resource owner authentication failed"))
            }
            Err(_) => {
                tracing::warn!("resource owner login timed out");
                Err(ApplicationError::access_denied("resource owner authentication timed out"))
            }
        }
    }

    /// Mint a code for an identified owner and build the success redirect.
    pub async fn approve(
        &self,
        request: &AuthorizationRequest,
        owner_id: &OwnerId,
    ) -> ApplicationResult<AuthorizationGrant> {
        let code = self
            .codes
            .issue(&request.client, owner_id, request.scope.clone(), &request.redirect_uri)
            .await?;

        let mut params = vec![("code", code.code.as_str())];
        if let Some(state) = request.state.as_deref() {
            params.push(("state", state));
        }
        let location = append_query(&request.redirect_uri, &params)?;

        tracing::info!(client_id = %request.client.id, scope = %request.scope, "authorization code issued");

        Ok(AuthorizationGrant { code, location })
    }

    /// Redirect carrying `error`, for failures after the request was validated.
    pub fn error_redirect(
        &self,
        request: &AuthorizationRequest,
        error: &ApplicationError,
    ) -> ApplicationResult<String> {
        error_location(&request.redirect_uri, error, request.state.as_deref())
    }
}

fn error_location(
    redirect_uri: &str,
    error: &ApplicationError,
    state: Option<&str>,
) -> ApplicationResult<String> {
    let description = error.description();

    let mut params = vec![
        ("error", error.oauth_code()),
        ("error_description", description.as_str()),
    ];
    if let Some(state) = state {
        params.push(("state", state));
    }
    append_query(redirect_uri, &params)
}

fn append_query(base: &str, params: &[(&str, &str)]) -> ApplicationResult<String> {
    let mut url = Url::parse(base)
        .map_err(|err| ApplicationError::invalid_request(format!("invalid redirect uri: {err}")))?;
    {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }
    Ok(url.into())
}
