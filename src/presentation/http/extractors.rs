// src/presentation/http/extractors.rs
use crate::application::{error::ApplicationError, registry::ClientCredentials};
use axum::{extract::FromRequestParts, http::request::Parts};
use headers::{Authorization, HeaderMapExt, authorization::Basic};
use std::convert::Infallible;

/// Client credentials from an `Authorization: Basic` header, if any.
#[derive(Debug, Clone, Default)]
pub struct BasicClientAuth(pub Option<ClientCredentials>);

impl<S> FromRequestParts<S> for BasicClientAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let credentials = parts
            .headers
            .typed_get::<Authorization<Basic>>()
            .map(|header| {
                ClientCredentials::new(header.username(), Some(header.password().to_string()))
            });
        Ok(Self(credentials))
    }
}

impl BasicClientAuth {
    /// Merge header credentials with the `client_id`/`client_secret` form
    /// fields. The header wins; a form `client_id` naming a different client
    /// is rejected.
    pub fn resolve(
        self,
        form_client_id: Option<&str>,
        form_client_secret: Option<&str>,
    ) -> Result<ClientCredentials, ApplicationError> {
        let form_client_id = form_client_id.filter(|id| !id.is_empty());

        match self.0 {
            Some(basic) => {
                if form_client_id.is_some_and(|id| id != basic.client_id) {
                    return Err(ApplicationError::invalid_request(
                        "client_id does not match the authenticated client",
                    ));
                }
                Ok(basic)
            }
            None => {
                let client_id = form_client_id.ok_or_else(|| {
                    ApplicationError::invalid_client("client authentication is required")
                })?;
                Ok(ClientCredentials::new(
                    client_id,
                    form_client_secret.map(str::to_string),
                ))
            }
        }
    }
}
