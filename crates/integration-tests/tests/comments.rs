//! Per-product comments.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use cornershop_integration_tests::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_add_list_and_remove() {
    let app = TestApp::spawn().await;

    let (status, list) = app
        .post("/products/1/comments", &json!({ "text": "  great  " }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!(["great"]));

    app.post("/products/1/comments", &json!({ "text": "meh" }))
        .await;

    let (_, page) = app.get("/products/1").await;
    assert_eq!(page["comments"], json!(["great", "meh"]));

    let (status, list) = app.delete("/products/1/comments/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!(["meh"]));

    // Other products are unaffected.
    let (_, other) = app.get("/products/2").await;
    assert!(other["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_comment_rejected() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/products/1/comments", &json!({ "text": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "comment cannot be empty");
}

#[tokio::test]
async fn test_remove_out_of_range() {
    let app = TestApp::spawn().await;
    app.post("/products/1/comments", &json!({ "text": "only" }))
        .await;

    let (status, _) = app.delete("/products/1/comments/5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, page) = app.get("/products/1").await;
    assert_eq!(page["comments"], json!(["only"]));
}
