//! HTTP route handlers for the storefront.
//!
//! All responses are JSON.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Health check
//! GET    /                                - Featured products + session
//!
//! # Products
//! GET    /products?category=&q=&page=     - Browse (q wins over category)
//! GET    /products/categories             - Category labels
//! GET    /products/suggest?q=             - Up to 5 suggestions
//! GET    /products/{id}                   - Detail + similar + comments
//! POST   /products/{id}/comments          - Add comment
//! DELETE /products/{id}/comments/{index}  - Remove comment
//!
//! # Cart (requires login, except count)
//! GET    /cart?shipping=                  - Hydrated cart + summary
//! GET    /cart/count                      - Total quantity
//! POST   /cart/items                      - Add one unit
//! PUT    /cart/items/{id}?shipping=       - Set quantity
//! DELETE /cart/items/{id}?shipping=       - Remove line
//! POST   /cart/checkout                   - Confirm purchase
//!
//! # Auth
//! GET    /auth/session                    - Session state
//! POST   /auth/register                   - Register
//! POST   /auth/login                      - Login
//! POST   /auth/logout                     - Logout
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(auth::session))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/categories", get(products::categories))
        .route("/suggest", get(products::suggest))
        .route("/{id}", get(products::show))
        .route("/{id}/comments", post(products::add_comment))
        .route("/{id}/comments/{index}", delete(products::remove_comment))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/items", post(cart::add))
        .route("/items/{id}", put(cart::update).delete(cart::remove))
        .route("/checkout", post(cart::checkout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
}
