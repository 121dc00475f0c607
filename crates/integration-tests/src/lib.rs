//! End-to-end tests for the Cornershop storefront.
//!
//! Each test spawns the real router on an ephemeral port, backed by a
//! [`MockCatalog`] and a throwaway store, and talks to it over HTTP with
//! `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cornershop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - Registration, login, logout and the session
//! - `browse` - Listing, category filter, search and product detail
//! - `cart_flow` - Cart gating, quantities, totals and checkout
//! - `comments` - Per-product comments
//! - `platform` - Health check, request ids and error bodies

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc
)]

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use cornershop_storefront::config::{CatalogConfig, StorefrontConfig};
use cornershop_storefront::state::AppState;
use cornershop_storefront::store::{FileStore, KeyValueStore, MemoryStore};
use cornershop_storefront::testing::MockCatalog;

pub use cornershop_storefront::testing::{product, sample_products};

/// Password used by [`TestApp::register_and_login`].
pub const PASSWORD: &str = "correct horse battery staple";

/// A running storefront plus its mock product API.
pub struct TestApp {
    pub client: Client,
    pub base_url: String,
    pub catalog: MockCatalog,
    pub state: AppState,
    server: JoinHandle<()>,
    _data_dir: Option<TempDir>,
}

impl TestApp {
    /// Spawn over [`sample_products`] and an in-memory store.
    pub async fn spawn() -> Self {
        Self::with_catalog(MockCatalog::start().await).await
    }

    /// Spawn over the given mock catalog and an in-memory store.
    pub async fn with_catalog(catalog: MockCatalog) -> Self {
        Self::build(catalog, Arc::new(MemoryStore::new()), None).await
    }

    /// Spawn over [`sample_products`] and a store file in a temp directory.
    pub async fn with_file_store() -> Self {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        Self::build(MockCatalog::start().await, Arc::new(store), Some(dir)).await
    }

    async fn build(
        catalog: MockCatalog,
        store: Arc<dyn KeyValueStore>,
        data_dir: Option<TempDir>,
    ) -> Self {
        let config = test_config(&catalog, data_dir.as_ref());
        let state = AppState::new(&config, store).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = cornershop_storefront::app(state.clone());
        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            catalog,
            state,
            server,
            _data_dir: data_dir,
        }
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        read_json(resp).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap();
        read_json(resp).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap();
        read_json(resp).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.delete(self.url(path)).send().await.unwrap();
        read_json(resp).await
    }

    /// Register Ada Lovelace with `email`.
    pub async fn register(&self, email: &str) -> (StatusCode, Value) {
        self.post(
            "/auth/register",
            &json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": email,
                "password": PASSWORD,
                "confirmPassword": PASSWORD,
            }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/auth/login",
            &json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Register and log in, asserting both succeed.
    pub async fn register_and_login(&self, email: &str) {
        let (status, _) = self.register(email).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = self.login(email, PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
    }

    /// Add one unit of product `id` to the cart.
    pub async fn add_to_cart(&self, id: i32) -> (StatusCode, Value) {
        self.post("/cart/items", &json!({ "productId": id })).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn test_config(catalog: &MockCatalog, data_dir: Option<&TempDir>) -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        data_path: data_dir.map_or_else(
            || "unused.json".into(),
            |dir| dir.path().join("store.json"),
        ),
        catalog: CatalogConfig {
            base_url: catalog.base_url(),
            list_limit: 150,
            cache_ttl: Duration::from_secs(60),
            timeout: Duration::from_secs(5),
        },
        sentry_dsn: None,
        sentry_environment: None,
        log_json: false,
    }
}

/// Status plus JSON body; non-JSON bodies come back as a JSON string.
pub async fn read_json(resp: reqwest::Response) -> (StatusCode, Value) {
    let status = resp.status();
    let text = resp.text().await.unwrap();
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    (status, body)
}

/// The `id` fields of a JSON product array.
pub fn ids(products: &Value) -> Vec<i64> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}
