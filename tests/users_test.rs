//! Registration, session, and health endpoint tests.

mod helpers;

use axum::http::StatusCode;
use helpers::{TestApp, basic_auth};
use serde_json::json;

#[tokio::test]
async fn test_status_and_stats() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/status", None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "redis": true, "db": true }));

    let response = app.request("GET", "/stats", None, &[]).await;
    assert_eq!(response.body, json!({ "users": 0, "files": 0 }));

    let (_, token) = app.signed_in("stats@example.com").await;
    app.upload(&token, json!({ "name": "docs", "type": "folder" }))
        .await;

    let response = app.request("GET", "/stats", None, &[]).await;
    assert_eq!(response.body, json!({ "users": 1, "files": 1 }));
}

#[tokio::test]
async fn test_register_returns_profile() {
    let app = TestApp::new().await;

    let body = app.register("bob@dylan.com", "toto1234!").await;
    assert_eq!(body["email"], "bob@dylan.com");
    assert!(body["id"].is_string());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/users", Some(json!({ "password": "x" })), &[])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "error": "Missing email" }));

    let response = app
        .request("POST", "/users", Some(json!({ "email": "a@b.com" })), &[])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "error": "Missing password" }));

    let response = app.request("POST", "/users", None, &[]).await;
    assert_eq!(response.body, json!({ "error": "Missing email" }));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new().await;
    app.register("bob@dylan.com", "toto1234!").await;

    let response = app
        .request(
            "POST",
            "/users",
            Some(json!({ "email": "bob@dylan.com", "password": "other" })),
            &[],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "error": "Already exist" }));
}

#[tokio::test]
async fn test_connect_me_disconnect() {
    let app = TestApp::new().await;
    let user = app.register("bob@dylan.com", "toto1234!").await;
    let token = app.login("bob@dylan.com", "toto1234!").await;

    let response = app
        .request("GET", "/users/me", None, &[("X-Token", &token)])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, user);

    let response = app
        .request("GET", "/disconnect", None, &[("X-Token", &token)])
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.bytes.is_empty());

    let response = app
        .request("GET", "/users/me", None, &[("X-Token", &token)])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, json!({ "error": "Unauthorized" }));

    let response = app
        .request("GET", "/disconnect", None, &[("X-Token", &token)])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_connect_rejects_bad_credentials() {
    let app = TestApp::new().await;
    app.register("bob@dylan.com", "toto1234!").await;

    let wrong = basic_auth("bob@dylan.com", "nope");
    let unknown = basic_auth("who@example.com", "toto1234!");
    for header in [wrong.as_str(), unknown.as_str(), "Basic !!!", "Bearer abc"] {
        let response = app
            .request("GET", "/connect", None, &[("Authorization", header)])
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{header}");
        assert_eq!(response.body, json!({ "error": "Unauthorized" }));
    }

    let response = app.request("GET", "/connect", None, &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_each_login_gets_its_own_token() {
    let app = TestApp::new().await;
    app.register("bob@dylan.com", "toto1234!").await;

    let first = app.login("bob@dylan.com", "toto1234!").await;
    let second = app.login("bob@dylan.com", "toto1234!").await;
    assert_ne!(first, second);

    app.request("GET", "/disconnect", None, &[("X-Token", &first)])
        .await;
    let response = app
        .request("GET", "/users/me", None, &[("X-Token", &second)])
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_me_without_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/users/me", None, &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/users/me", None, &[("X-Token", "not-a-session")])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
