//! Client for the remote product API.
//!
//! # Architecture
//!
//! - The product API is the source of truth; nothing is synced locally
//! - Responses are cached in memory via `moka` (TTL from `CatalogConfig`)
//! - Batch lookups fetch uncached products concurrently and fail as a whole
//!
//! # Endpoints
//!
//! - `GET {base}/products?limit=N` - listing
//! - `GET {base}/products/{id}` - single product
//!
//! # Example
//!
//! ```rust,ignore
//! use cornershop_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let product = client.product(ProductId::new(1)).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::CatalogClient;
pub use types::*;

use cornershop_core::ProductId;
use thiserror::Error;

/// Errors that can occur when talking to the product API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Product API returned HTTP {status} for {url}")]
    Status {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// A request URL could not be built from the base URL.
    #[error("Invalid product URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The product does not exist.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// A concurrent fetch task panicked or was cancelled.
    #[error("Fetch task failed: {0}")]
    Task(String),
}

impl CatalogError {
    /// True when the API reported the product as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
