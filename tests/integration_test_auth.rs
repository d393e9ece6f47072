mod common;

use axum::http::StatusCode;
use common::{TestApp, SUPERADMIN};
use serde_json::json;

#[tokio::test]
async fn test_health_is_not_prefixed() {
    let app = TestApp::new().await;
    let (status, body) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_returns_user_and_token() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request("POST", "/api/auth/login", None, Some(json!({ "username": SUPERADMIN })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["username"], SUPERADMIN);
    assert_eq!(body["user"]["userType"], "superadmin");
    assert!(body["user"]["orgId"].is_null());
}

#[tokio::test]
async fn test_login_is_case_insensitive_and_trimmed() {
    let app = TestApp::new().await;
    let (status, _) = app
        .request("POST", "/api/auth/login", None, Some(json!({ "username": "  ROOT@Test.org " })))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_rejects_unknown_and_empty_usernames() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request("POST", "/api/auth/login", None, Some(json!({ "username": "nobody@test.org" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = app
        .request("POST", "/api/auth/login", None, Some(json!({ "username": "   " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_requires_valid_bearer_token() {
    let app = TestApp::new().await;

    let (status, _) = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.superadmin().await;
    let (status, body) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], SUPERADMIN);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new().await;
    let token = app.superadmin().await;
    let other = app.superadmin().await;

    let (status, _) = app.request("POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Other sessions stay valid.
    let (status, _) = app.get("/api/auth/me", &other).await;
    assert_eq!(status, StatusCode::OK);
}
