// src/presentation/http/openapi.rs
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use std::{env, fs::File, io::BufWriter, path::Path};
use utoipa::openapi::{
    Components,
    security::{Http, HttpAuthScheme, SecurityScheme},
    server::Server,
};
use utoipa::{Modify, OpenApi, ToSchema};

pub const DEFAULT_SNAPSHOT_PATH: &str = "spec/openapi.json";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::authorize::authorize,
        crate::presentation::http::controllers::authorize::authorize_submit,
        crate::presentation::http::controllers::token::token,
        crate::presentation::http::controllers::token_info::token_info,
        crate::presentation::http::controllers::token_info::revoke,
        crate::presentation::http::controllers::token_info::access_token_owner,
        crate::presentation::http::controllers::discovery::server_metadata,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::authorize::AuthorizeParams,
            crate::presentation::http::controllers::authorize::AuthorizeForm,
            crate::presentation::http::controllers::token::TokenRequest,
            crate::presentation::http::controllers::token_info::TokenInfoRequest,
            crate::presentation::http::controllers::token_info::RevokeRequest,
            crate::presentation::http::controllers::discovery::ServerMetadata,
            crate::application::dto::TokenResponseDto,
            crate::application::dto::TokenIntrospectionDto,
            crate::application::dto::TokenOwnerDto
        )
    ),
    tags(
        (name = "OAuth2", description = "Authorization, token, introspection and revocation endpoints"),
        (name = "Internal", description = "Endpoints for trusted backend services"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    info(
        title = "Warden",
        description = "OAuth2 authorization server",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        components.add_security_scheme("basicAuth", SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)));

        if let Ok(issuer) = env::var("ISSUER") {
            let issuer = issuer.trim().trim_end_matches('/').to_string();
            if !issuer.is_empty() {
                openapi.servers = Some(vec![Server::new(issuer)]);
            }
        }
    }
}

pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn docs_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(serve_openapi))
}

pub fn write_openapi_snapshot(output_path: &Path) -> std::io::Result<()> {
    let spec = ApiDoc::openapi();
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &spec)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/authorize",
            "/token",
            "/info",
            "/revoke",
            "/internal/access-tokens/{token}/owner",
            "/.well-known/oauth-authorization-server",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn snapshot_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/openapi.json");
        write_openapi_snapshot(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["info"]["title"], "Warden");
    }
}
