// tests/support/helpers.rs
use super::builders::standard_clients;
use super::mocks::{
    ManualClock, PlainSecretHasher, SequentialTokenGenerator, StaticAssertionVerifier,
    StaticOwnerAuthenticator,
};
use axum::{
    Router,
    body::{self, Body},
    http::{HeaderMap, Method, Request, StatusCode, header},
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt as _;
use warden_core::application::{
    ports::collaborators::ResourceOwnerAuthenticator,
    services::{ApplicationServices, ServicePolicy},
};
use warden_core::domain::grant::OwnerId;
use warden_core::domain::scope::ScopeSet;
use warden_core::infrastructure::repositories::{
    InMemoryAuthorizationCodeRepository, InMemoryClientRepository, InMemoryTokenRepository,
};
use warden_core::presentation::http::{routes::build_router, state::HttpState};

pub const TEST_ISSUER: &str = "https://auth.test";

/// Services wired to in-memory stores, a manual clock and static collaborators,
/// plus the router on top of them.
pub struct TestApp {
    pub services: Arc<ApplicationServices>,
    pub clock: Arc<ManualClock>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(ServicePolicy::default())
    }

    pub fn with_policy(policy: ServicePolicy) -> Self {
        Self::build(policy, Arc::new(StaticOwnerAuthenticator))
    }

    pub fn build(policy: ServicePolicy, authenticator: Arc<dyn ResourceOwnerAuthenticator>) -> Self {
        let clock = Arc::new(ManualClock::default());
        let clients = InMemoryClientRepository::new(standard_clients()).expect("fixture clients");

        let services = Arc::new(ApplicationServices::new(
            Arc::new(clients),
            Arc::new(InMemoryAuthorizationCodeRepository::new(clock.clone())),
            Arc::new(InMemoryTokenRepository::new(clock.clone())),
            Arc::new(PlainSecretHasher),
            Arc::new(SequentialTokenGenerator::default()),
            authenticator,
            Arc::new(StaticAssertionVerifier),
            clock.clone(),
            policy,
        ));

        let router = build_router(HttpState {
            services: Arc::clone(&services),
            issuer: TEST_ISSUER.into(),
        });

        Self {
            services,
            clock,
            router,
        }
    }

    /// Mint a code directly through the code store, bypassing /authorize.
    pub async fn issue_code(&self, client_id: &str, owner: &str, scope: &str, redirect_uri: &str) -> String {
        let client = self.services.registry().lookup(client_id).await.expect("client");
        self.services
            .code_store()
            .issue(
                &client,
                &OwnerId::new(owner).unwrap(),
                ScopeSet::parse(scope).unwrap(),
                redirect_uri,
            )
            .await
            .expect("issue code")
            .code
    }

    pub async fn post_form(
        &self,
        uri: &str,
        pairs: &[(&str, &str)],
        basic: Option<(&str, &str)>,
    ) -> Response {
        let body = serde_urlencoded::to_string(pairs).unwrap();
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some((id, secret)) = basic {
            builder = builder.header(header::AUTHORIZATION, basic_header(id, secret));
        }
        let req = builder.body(Body::from(body)).unwrap();
        self.router.clone().oneshot(req).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(req).await.unwrap()
    }

    /// POST /token and return status plus JSON body.
    pub async fn token(&self, pairs: &[(&str, &str)], basic: Option<(&str, &str)>) -> (StatusCode, Value) {
        let (status, _, json) = read_json(self.post_form("/token", pairs, basic).await).await;
        (status, json)
    }
}

pub fn basic_header(client_id: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{client_id}:{secret}")))
}

pub async fn read_json(resp: Response) -> (StatusCode, HeaderMap, Value) {
    let (parts, body_stream) = resp.into_parts();
    let bytes = body::to_bytes(body_stream, 1024 * 1024).await.expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (parts.status, parts.headers, json)
}

/// Assert an RFC 6749 error body with the expected status and `error` code.
pub async fn assert_oauth_error(resp: Response, expected_status: StatusCode, expected_error: &str) -> Value {
    let (status, headers, json) = read_json(resp).await;
    assert_eq!(status, expected_status, "unexpected status, body: {json}");
    let ct = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    assert_eq!(json["error"], expected_error, "unexpected body: {json}");
    json
}

/// Value of `key` in the query string of a redirect `Location`.
pub fn location_param(resp: &Response, key: &str) -> Option<String> {
    let location = resp.headers().get(header::LOCATION)?.to_str().ok()?;
    let url = url::Url::parse(location).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
