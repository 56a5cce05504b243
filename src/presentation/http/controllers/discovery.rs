// src/presentation/http/controllers/discovery.rs
use crate::domain::client::GrantType;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// RFC 8414 authorization server metadata.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServerMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub revocation_endpoint: String,
    pub introspection_endpoint: String,
    pub response_types_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
    pub revocation_endpoint_auth_methods_supported: Vec<String>,
}

impl ServerMetadata {
    pub fn for_issuer(issuer: &str) -> Self {
        let base = issuer.trim_end_matches('/');
        let auth_methods: Vec<String> = ["client_secret_basic", "client_secret_post", "none"]
            .into_iter()
            .map(String::from)
            .collect();

        Self {
            issuer: base.to_string(),
            authorization_endpoint: format!("{base}/authorize"),
            token_endpoint: format!("{base}/token"),
            revocation_endpoint: format!("{base}/revoke"),
            introspection_endpoint: format!("{base}/info"),
            response_types_supported: vec!["code".into()],
            grant_types_supported: GrantType::ALL
                .iter()
                .map(|grant| grant.as_str().to_string())
                .collect(),
            token_endpoint_auth_methods_supported: auth_methods.clone(),
            revocation_endpoint_auth_methods_supported: auth_methods,
        }
    }
}

#[utoipa::path(
    get,
    path = "/.well-known/oauth-authorization-server",
    responses(
        (status = 200, description = "Authorization server metadata", body = ServerMetadata),
    ),
    security([]),
    tag = "OAuth2"
)]
pub async fn server_metadata(Extension(state): Extension<HttpState>) -> Json<ServerMetadata> {
    Json(ServerMetadata::for_issuer(&state.issuer))
}
