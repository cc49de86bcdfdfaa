mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn register_then_login() {
    let app = TestApp::new().await;
    app.register("astrid").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "astrid", "password": "correct horse" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "astrid");
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = TestApp::new().await;
    app.register("astrid").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "astrid", "password": "another password" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username is already taken.");
}

#[tokio::test]
async fn short_credentials_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "ab", "password": "correct horse" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "astrid", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn username_length_counts_characters() {
    let app = TestApp::new().await;

    // 20 characters, 40 bytes
    app.register(&"ø".repeat(20)).await;

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "åæ", "password": "correct horse" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.register("astrid").await;

    for username in ["astrid", "nobody"] {
        let (status, body) = app
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "username": username, "password": "wrong password" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid username or password.");
    }
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = TestApp::new().await;

    let (status, _) = app.send(Method::GET, "/me/listings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(Method::GET, "/me/reservations", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
