// src/application/queries/token_info.rs
use crate::application::{
    dto::{TokenIntrospectionDto, TokenOwnerDto},
    error::{ApplicationError, ApplicationResult},
    stores::TokenStore,
};
use std::sync::Arc;

pub struct TokenQueryService {
    tokens: Arc<TokenStore>,
}

impl TokenQueryService {
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        Self { tokens }
    }

    /// Describe an access token. Anything not currently valid reports
    /// `active: false` with no further detail.
    pub async fn introspect(&self, token: &str) -> ApplicationResult<TokenIntrospectionDto> {
        let access = match self.tokens.lookup_access_token(token).await {
            Ok(access) => access,
            Err(ApplicationError::InvalidGrant(_)) => return Ok(TokenIntrospectionDto::inactive()),
            Err(err) => return Err(err),
        };

        Ok(TokenIntrospectionDto {
            active: true,
            client_id: Some(access.client_id.to_string()),
            scope: Some(access.scope.to_string()),
            sub: access.owner_id.as_ref().map(ToString::to_string),
            exp: Some(access.expires_at.timestamp()),
            iat: Some(access.created_at.timestamp()),
            token_type: Some("bearer".into()),
        })
    }

    /// Resource owner behind a valid access token.
    pub async fn owner_of(&self, token: &str) -> ApplicationResult<TokenOwnerDto> {
        let access = self
            .tokens
            .lookup_access_token(token)
            .await
            .map_err(|err| match err {
                ApplicationError::InvalidGrant(_) => {
                    ApplicationError::not_found("access token is invalid or expired")
                }
                other => other,
            })?;

        let owner = access
            .owner_id
            .ok_or_else(|| ApplicationError::not_found("access token has no resource owner"))?;

        Ok(TokenOwnerDto {
            owner_id: owner.to_string(),
        })
    }
}
