//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::services::{AuthService, CartService, CatalogService, CommentService};
use crate::store::KeyValueStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// key-value store and the catalog client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn KeyValueStore>,
    catalog: CatalogClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(
        config: &StorefrontConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                store,
                catalog,
            }),
        })
    }

    /// Get a reference to the key-value store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the product API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Authentication service over the shared store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.store())
    }

    /// Catalog page service.
    #[must_use]
    pub fn catalog_pages(&self) -> CatalogService<'_> {
        CatalogService::new(self.catalog())
    }

    /// Cart service over the shared store and catalog.
    #[must_use]
    pub fn cart(&self) -> CartService<'_> {
        CartService::new(self.store(), self.catalog())
    }

    /// Comment service over the shared store.
    #[must_use]
    pub fn comments(&self) -> CommentService<'_> {
        CommentService::new(self.store())
    }
}
