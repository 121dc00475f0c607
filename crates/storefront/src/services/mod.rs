//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration, login and the stored current user
//! - `browser` - In-memory filter, search and pagination state
//! - `catalog` - Home, browse and product detail pages
//! - `cart` - Cart mutations, hydration and checkout
//! - `comments` - Per-product comment lists
//!
//! Services borrow the key-value store and the catalog client, so both entry
//! points (HTTP handlers and CLI commands) build them per call.

pub mod auth;
pub mod browser;
pub mod cart;
pub mod catalog;
pub mod comments;

pub use auth::{AuthError, AuthService, Registration};
pub use browser::{CatalogBrowser, CategoryFilter, PAGE_SIZE, PageLink, PageView};
pub use cart::{CartError, CartLine, CartService, CartSummary, CartView, CheckoutConfirmation};
pub use catalog::{BrowsePage, BrowseQuery, CatalogService, ProductDetail};
pub use comments::{CommentError, CommentService};
