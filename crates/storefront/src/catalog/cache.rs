//! Cache types for product API responses.

use std::sync::Arc;

use cornershop_core::ProductId;

use super::types::Product;

/// Cache key for single products and listings.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Listing { limit: Option<u32> },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Listing(Arc<Vec<Product>>),
}
