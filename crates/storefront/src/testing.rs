//! In-process stand-in for the product API, for tests.
//!
//! Enabled for this crate's unit tests and, through the `test-support`
//! feature, for the integration test crate.

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use cornershop_core::{Money, ProductId};

use crate::catalog::{Product, ProductList};

/// Page size the product API uses when no `limit` is given.
const DEFAULT_LIMIT: usize = 30;

const SAMPLE: &[(&str, &str, i64)] = &[
    ("Essence Mascara Lash Princess", "beauty", 999),
    ("Eyeshadow Palette with Mirror", "beauty", 1999),
    ("Powder Canister", "beauty", 1499),
    ("Red Lipstick", "beauty", 1299),
    ("Red Nail Polish", "beauty", 899),
    ("Calvin Klein CK One", "fragrances", 4999),
    ("Chanel Coco Noir Eau De", "fragrances", 12999),
    ("Dior J'adore", "fragrances", 8999),
    ("Dolce Shine Eau de", "fragrances", 6999),
    ("Gucci Bloom Eau de", "fragrances", 7999),
    ("Annibale Colombo Bed", "furniture", 189_999),
    ("Annibale Colombo Sofa", "furniture", 249_999),
    ("Bedside Table African Cherry", "furniture", 29_999),
    ("Knoll Saarinen Executive Conference Chair", "furniture", 49_999),
    ("Wooden Bathroom Sink With Mirror", "furniture", 79_999),
    ("Apple", "groceries", 199),
    ("Beef Steak", "groceries", 1299),
    ("Cat Food", "groceries", 899),
    ("Chicken Meat", "groceries", 999),
    ("Cooking Oil", "groceries", 499),
];

/// Twenty products across four categories, ids 1 to 20, five per category
/// in the order beauty, fragrances, furniture, groceries.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    SAMPLE
        .iter()
        .zip(1..)
        .map(|(&(title, category, cents), id)| Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Money::from_cents(cents),
            category: category.to_string(),
            thumbnail: format!("https://cdn.example.com/products/{id}/thumbnail.webp"),
            rating: 4.5,
            stock: 10,
            discount_percentage: 5.0,
            description: format!("{title} from the {category} aisle."),
        })
        .collect()
}

/// Build a single product with an arbitrary price.
#[must_use]
pub fn product(id: i32, title: &str, category: &str, price: Decimal) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Money::new(price),
        category: category.to_string(),
        thumbnail: String::new(),
        rating: 0.0,
        stock: 1,
        discount_percentage: 0.0,
        description: String::new(),
    }
}

struct MockState {
    products: Vec<Product>,
    product_hits: AtomicUsize,
    listing_hits: AtomicUsize,
    failing: AtomicBool,
}

/// A running mock product API bound to an ephemeral local port.
///
/// The server task is aborted when the handle is dropped.
pub struct MockCatalog {
    base_url: Url,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

impl MockCatalog {
    /// Serve [`sample_products`].
    pub async fn start() -> Self {
        Self::with_products(sample_products()).await
    }

    /// Serve the given products.
    pub async fn with_products(products: Vec<Product>) -> Self {
        let state = Arc::new(MockState {
            products,
            product_hits: AtomicUsize::new(0),
            listing_hits: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        });

        let router = Router::new()
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
            state,
            server,
        }
    }

    /// Root URL to configure the catalog client with.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Number of single-product requests served.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }

    /// Number of listing requests served.
    #[must_use]
    pub fn listing_hits(&self) -> usize {
        self.state.listing_hits.load(Ordering::SeqCst)
    }

    /// Make every request answer 500 until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }
}

impl Drop for MockCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn list_products(
    State(state): State<Arc<MockState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    state.listing_hits.fetch_add(1, Ordering::SeqCst);
    if state.failing.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let products: Vec<Product> = state.products.iter().take(limit).cloned().collect();
    Json(ProductList {
        total: u32::try_from(state.products.len()).unwrap(),
        skip: 0,
        limit: u32::try_from(products.len()).unwrap(),
        products,
    })
    .into_response()
}

async fn get_product(State(state): State<Arc<MockState>>, Path(id): Path<i32>) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    if state.failing.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match state.products.iter().find(|p| p.id == ProductId::new(id)) {
        Some(product) => Json(product.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": format!("Product with id '{id}' not found") })),
        )
            .into_response(),
    }
}
