// src/application/dto/token.rs
use crate::domain::grant::{AccessToken, RefreshToken};
use crate::domain::scope::ScopeSet;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of a successful grant.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: AccessToken,
    pub refresh_token: Option<RefreshToken>,
    pub scope: ScopeSet,
    /// What the client asked for; empty when the request carried no scope.
    pub requested_scope: ScopeSet,
}

impl TokenGrant {
    pub fn expires_in(&self) -> i64 {
        self.access_token.expires_in(self.access_token.created_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponseDto {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl From<TokenGrant> for TokenResponseDto {
    fn from(grant: TokenGrant) -> Self {
        let expires_in = grant.expires_in();
        let scope = (grant.scope != grant.requested_scope && !grant.scope.is_empty())
            .then(|| grant.scope.to_string());

        Self {
            access_token: grant.access_token.token,
            token_type: "bearer".into(),
            expires_in,
            refresh_token: grant.refresh_token.map(|refresh| refresh.token),
            scope,
        }
    }
}
