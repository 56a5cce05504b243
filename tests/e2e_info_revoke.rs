// tests/e2e_info_revoke.rs
use axum::http::{StatusCode, header};
use chrono::Duration;
use serde_json::Value;

mod support;

use support::{APP_REDIRECT, TEST_ISSUER, TestApp, assert_oauth_error, fixed_now, read_json};

/// Run a code exchange for c1 and return the token response body.
async fn c1_tokens(app: &TestApp) -> Value {
    let code = app.issue_code("c1", "u1", "read", APP_REDIRECT).await;
    let (status, body) = app
        .token(
            &[
                ("grant_type", "authorization_code"),
                ("code", &code),
                ("redirect_uri", APP_REDIRECT),
            ],
            Some(("c1", "s1")),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    body
}

async fn info(app: &TestApp, token: &str) -> Value {
    let (status, headers, body) =
        read_json(app.post_form("/info", &[("token", token)], None).await).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
    body
}

#[tokio::test]
async fn info_describes_an_active_token() {
    let app = TestApp::new();
    let tokens = c1_tokens(&app).await;
    let access = tokens["access_token"].as_str().unwrap();

    let body = info(&app, access).await;
    assert_eq!(body["active"], true);
    assert_eq!(body["client_id"], "c1");
    assert_eq!(body["scope"], "read");
    assert_eq!(body["sub"], "u1");
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["iat"], fixed_now().timestamp());
    assert_eq!(body["exp"], fixed_now().timestamp() + 3600);
}

#[tokio::test]
async fn info_reports_inactive_without_detail() {
    let app = TestApp::new();
    let tokens = c1_tokens(&app).await;
    let access = tokens["access_token"].as_str().unwrap();

    let unknown = info(&app, "not-a-token").await;
    assert_eq!(unknown, serde_json::json!({ "active": false }));

    // refresh tokens are not access tokens
    let refresh = info(&app, tokens["refresh_token"].as_str().unwrap()).await;
    assert_eq!(refresh["active"], false);

    app.clock.advance(Duration::hours(2));
    let expired = info(&app, access).await;
    assert_eq!(expired, serde_json::json!({ "active": false }));
}

#[tokio::test]
async fn info_requires_a_token() {
    let app = TestApp::new();
    let resp = app.post_form("/info", &[], None).await;
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_request").await;
}

#[tokio::test]
async fn owner_endpoint_answers_for_owner_bound_tokens_only() {
    let app = TestApp::new();
    let tokens = c1_tokens(&app).await;
    let access = tokens["access_token"].as_str().unwrap();

    let (status, _, body) = read_json(
        app.get(&format!("/internal/access-tokens/{access}/owner"))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner_id"], "u1");

    let resp = app.get("/internal/access-tokens/unknown/owner").await;
    assert_oauth_error(resp, StatusCode::NOT_FOUND, "not_found").await;

    let (_, service) = app
        .token(&[("grant_type", "client_credentials")], Some(("svc", "svc-secret")))
        .await;
    let service_token = service["access_token"].as_str().unwrap();
    let resp = app
        .get(&format!("/internal/access-tokens/{service_token}/owner"))
        .await;
    assert_oauth_error(resp, StatusCode::NOT_FOUND, "not_found").await;
}

#[tokio::test]
async fn revoking_an_access_token_deactivates_it() {
    let app = TestApp::new();
    let tokens = c1_tokens(&app).await;
    let access = tokens["access_token"].as_str().unwrap();

    let resp = app
        .post_form("/revoke", &[("token", access)], Some(("c1", "s1")))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(info(&app, access).await["active"], false);

    // the refresh token still works
    let (status, _) = app
        .token(
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", tokens["refresh_token"].as_str().unwrap()),
            ],
            Some(("c1", "s1")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn revoking_a_refresh_token_takes_its_access_tokens_along() {
    let app = TestApp::new();
    let tokens = c1_tokens(&app).await;
    let access = tokens["access_token"].as_str().unwrap();
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let resp = app
        .post_form(
            "/revoke",
            &[
                ("token", refresh),
                ("token_type_hint", "refresh_token"),
                ("client_id", "c1"),
                ("client_secret", "s1"),
            ],
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(info(&app, access).await["active"], false);
    let resp = app
        .post_form(
            "/token",
            &[("grant_type", "refresh_token"), ("refresh_token", refresh)],
            Some(("c1", "s1")),
        )
        .await;
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn revoking_unknown_tokens_succeeds_silently() {
    let app = TestApp::new();
    let resp = app
        .post_form("/revoke", &[("token", "never-issued")], Some(("c1", "s1")))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn clients_cannot_revoke_each_others_tokens() {
    let app = TestApp::new();
    let tokens = c1_tokens(&app).await;
    let access = tokens["access_token"].as_str().unwrap();

    let resp = app
        .post_form("/revoke", &[("token", access)], Some(("c2", "s2")))
        .await;
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "unauthorized_client").await;
    assert_eq!(info(&app, access).await["active"], true);
}

#[tokio::test]
async fn revoke_requires_client_authentication() {
    let app = TestApp::new();

    let resp = app
        .post_form("/revoke", &[("token", "x")], Some(("c1", "wrong")))
        .await;
    assert!(resp.headers().get(header::WWW_AUTHENTICATE).is_some());
    assert_oauth_error(resp, StatusCode::UNAUTHORIZED, "invalid_client").await;

    let resp = app.post_form("/revoke", &[], Some(("c1", "s1"))).await;
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_request").await;
}

#[tokio::test]
async fn metadata_advertises_endpoints_under_the_issuer() {
    let app = TestApp::new();
    let (status, _, body) =
        read_json(app.get("/.well-known/oauth-authorization-server").await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issuer"], TEST_ISSUER);
    assert_eq!(body["token_endpoint"], format!("{TEST_ISSUER}/token"));
    assert_eq!(body["authorization_endpoint"], format!("{TEST_ISSUER}/authorize"));
    let grants: Vec<&str> = body["grant_types_supported"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(grants.contains(&"assertion"));
    assert!(grants.contains(&"refresh_token"));
    assert_eq!(grants.len(), 5);
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = TestApp::new();

    let (status, _, body) = read_json(app.get("/health").await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _, doc) = read_json(app.get("/api-docs/openapi.json").await).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/token").is_some());
}
