//! Registration, login, logout and the session.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use cornershop_integration_tests::{PASSWORD, TestApp};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::spawn().await;

    let (status, user) = app.register("ada@example.com").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "ada@example.com");
    assert!(user.get("passwordHash").is_none());

    // Registration does not log in.
    let (_, session) = app.get("/auth/session").await;
    assert_eq!(session["authenticated"], false);

    let (status, body) = app.login("ada@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["firstName"], "Ada");
    assert_eq!(body["redirect"], "/products");

    let (_, session) = app.get("/auth/session").await;
    assert_eq!(session["authenticated"], true);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::spawn().await;
    app.register("ada@example.com").await;

    let (status, body) = app.register("ada@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already"));
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .post(
            "/auth/register",
            &json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "one",
                "confirmPassword": "two",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/auth/register",
            &json!({
                "firstName": "  ",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "pw",
                "confirmPassword": "pw",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/auth/register",
            &json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "not-an-email",
                "password": "pw",
                "confirmPassword": "pw",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::spawn().await;
    app.register("ada@example.com").await;

    let (status, wrong) = app.login("ada@example.com", "nope").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown) = app.login("grace@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong["error"], unknown["error"]);
    assert_eq!(wrong["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_logout_clears_session_and_cart() {
    let app = TestApp::spawn().await;
    app.register_and_login("ada@example.com").await;
    app.add_to_cart(1).await;

    let (status, body) = app.post("/auth/logout", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);

    let (_, count) = app.get("/cart/count").await;
    assert_eq!(count["count"], 0);

    let (status, _) = app.get("/cart").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_home_shows_user_with_file_store() {
    let app = TestApp::with_file_store().await;
    app.register_and_login("ada@example.com").await;

    let (_, home) = app.get("/").await;
    assert_eq!(home["session"]["authenticated"], true);
    assert_eq!(home["session"]["user"]["email"], "ada@example.com");
}
