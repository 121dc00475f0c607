//! Cart gating, quantities, totals and checkout.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use cornershop_integration_tests::{TestApp, product};
use cornershop_storefront::error::LOGIN_PATH;
use cornershop_storefront::testing::MockCatalog;
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use rust_decimal::Decimal;
use serde_json::json;

async fn priced_app() -> TestApp {
    let catalog = MockCatalog::with_products(vec![
        product(1, "Notebook", "stationery", Decimal::new(1000, 2)),
        product(2, "Pen", "stationery", Decimal::new(500, 2)),
    ])
    .await;
    TestApp::with_catalog(catalog).await
}

#[tokio::test]
async fn test_cart_requires_login() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/cart/items"))
        .json(&json!({ "productId": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers()[LOCATION], LOGIN_PATH);

    // Count works without a session.
    let (status, count) = app.get("/cart/count").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_add_twice_increments() {
    let app = TestApp::spawn().await;
    app.register_and_login("ada@example.com").await;

    let (status, first) = app.add_to_cart(3).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["quantity"], 1);

    let (_, second) = app.add_to_cart(3).await;
    assert_eq!(second["quantity"], 2);
    assert_eq!(second["count"], 2);

    let (_, cart) = app.get("/cart").await;
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);
    assert_eq!(cart["itemCount"], 2);
}

#[tokio::test]
async fn test_add_unknown_product() {
    let app = TestApp::spawn().await;
    app.register_and_login("ada@example.com").await;

    let (status, _) = app.add_to_cart(999).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, count) = app.get("/cart/count").await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_summary_with_shipping_options() {
    let app = priced_app().await;
    app.register_and_login("ada@example.com").await;

    app.add_to_cart(1).await;
    app.add_to_cart(2).await;
    app.put("/cart/items/1", &json!({ "quantity": 2 })).await;

    let (_, cart) = app.get("/cart").await;
    assert_eq!(cart["shippingOption"], "standard");
    assert_eq!(cart["summary"]["subtotal"], "25.00");
    assert_eq!(cart["summary"]["shipping"], "3.50");
    assert_eq!(cart["summary"]["total"], "28.50");

    let (_, express) = app.get("/cart?shipping=express").await;
    assert_eq!(express["summary"]["total"], "35.00");

    let (_, free) = app.get("/cart?shipping=free").await;
    assert_eq!(free["summary"]["total"], "25.00");

    let (status, _) = app.get("/cart?shipping=teleport").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quantity_is_clamped_to_one() {
    let app = priced_app().await;
    app.register_and_login("ada@example.com").await;
    app.add_to_cart(1).await;

    let (status, cart) = app.put("/cart/items/1", &json!({ "quantity": 0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["lines"][0]["quantity"], 1);

    let (_, cart) = app.put("/cart/items/1", &json!({ "quantity": "abc" })).await;
    assert_eq!(cart["lines"][0]["quantity"], 1);

    let (_, cart) = app.put("/cart/items/1", &json!({ "quantity": "4" })).await;
    assert_eq!(cart["lines"][0]["quantity"], 4);
    assert_eq!(cart["lines"][0]["lineTotal"], "40.00");

    let (status, _) = app.put("/cart/items/2", &json!({ "quantity": 3 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_line() {
    let app = priced_app().await;
    app.register_and_login("ada@example.com").await;
    app.add_to_cart(1).await;
    app.add_to_cart(2).await;

    let (status, cart) = app.delete("/cart/items/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);
    assert_eq!(cart["lines"][0]["product"]["id"], 2);

    let (status, _) = app.delete("/cart/items/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_checkout() {
    let app = priced_app().await;
    app.register_and_login("ada@example.com").await;

    let (status, _) = app
        .post("/cart/checkout", &json!({ "address": "1 Main St" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.add_to_cart(1).await;

    let (status, _) = app
        .post("/cart/checkout", &json!({ "address": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, confirmation) = app
        .post(
            "/cart/checkout",
            &json!({ "address": "1 Main St", "shipping": "express" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmation["message"], "Thank you for your purchase!");
    assert_eq!(confirmation["total"], "20.00");

    // The cart is kept after checkout.
    let (_, count) = app.get("/cart/count").await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_cart_view_fails_whole_when_catalog_is_down() {
    let app = priced_app().await;
    app.register_and_login("ada@example.com").await;
    app.add_to_cart(1).await;
    app.state.catalog().invalidate_all();
    app.catalog.set_failing(true);

    let (status, _) = app.get("/cart").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
