//! Product API client implementation.
//!
//! Uses `reqwest` 0.13 for HTTP. Single products and listings share one
//! `moka` cache.

use std::sync::Arc;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tokio::task::JoinSet;
use tracing::{debug, instrument};
use url::Url;

use cornershop_core::ProductId;

use super::CatalogError;
use super::cache::{CacheKey, CacheValue};
use super::types::{Product, ProductList};
use crate::config::CatalogConfig;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote product API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    list_limit: u32,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new product API client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                list_limit: config.list_limit,
                cache,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                url = %url,
                body = %response_text.chars().take(200).collect::<String>(),
                "Product API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse product API response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get one product by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the API answers 404, or another
    /// error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&format!("products/{id}"))?;
        let product: Product = match self.get_json(url).await {
            Ok(product) => product,
            Err(CatalogError::Status { status: 404, .. }) => {
                return Err(CatalogError::NotFound(id));
            }
            Err(e) => return Err(e),
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a product listing. `None` uses the API's default page size.
    ///
    /// Every listed product is also cached individually.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, limit: Option<u32>) -> Result<Arc<Vec<Product>>, CatalogError> {
        let cache_key = CacheKey::Listing { limit };

        if let Some(CacheValue::Listing(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for listing");
            return Ok(products);
        }

        let mut url = self.endpoint("products")?;
        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }

        let list: ProductList = self.get_json(url).await?;
        debug!(count = list.products.len(), "Fetched product listing");

        for product in &list.products {
            self.inner
                .cache
                .insert(
                    CacheKey::Product(product.id),
                    CacheValue::Product(Box::new(product.clone())),
                )
                .await;
        }

        let products = Arc::new(list.products);
        self.inner
            .cache
            .insert(cache_key, CacheValue::Listing(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// The full browse listing, `limit` taken from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn all_products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        self.list(Some(self.inner.list_limit)).await
    }

    /// Get several products, preserving the order of `ids`.
    ///
    /// Uncached products are fetched concurrently. If any lookup fails the
    /// remaining fetches are aborted and the first error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first `CatalogError` any lookup produced.
    #[instrument(skip(self), fields(count = ids.len()))]
    pub async fn products(&self, ids: &[ProductId]) -> Result<Vec<Product>, CatalogError> {
        let mut tasks = JoinSet::new();
        for (index, id) in ids.iter().copied().enumerate() {
            let client = self.clone();
            tasks.spawn(async move { (index, client.product(id).await) });
        }

        let mut slots: Vec<Option<Product>> = (0..ids.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined.map_err(|e| CatalogError::Task(e.to_string()))?;
            match result {
                Ok(product) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(product);
                    }
                }
                Err(e) => {
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| CatalogError::Task("product fetch did not complete".to_string()))
    }

    /// Drop every cached response.
    pub fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
    }
}
