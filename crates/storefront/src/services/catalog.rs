//! Catalog pages: home, browse, suggestions and product detail.

use serde::Serialize;
use tracing::{instrument, warn};

use cornershop_core::ProductId;

use super::browser::{CatalogBrowser, CategoryFilter, PAGE_SIZE, PageView};
use crate::catalog::{CatalogClient, CatalogError, Product};

/// How the browse listing should be narrowed.
#[derive(Debug, Clone, Default)]
pub struct BrowseQuery {
    pub category: Option<String>,
    /// A non-blank search query takes precedence over `category`.
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// A rendered browse page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsePage {
    pub categories: Vec<String>,
    pub selected_category: CategoryFilter,
    /// Active search query, empty when not searching.
    pub query: String,
    /// Suggestion list for the search box.
    pub suggestions: Vec<Product>,
    #[serde(flatten)]
    pub page: PageView,
}

/// One product with its same-category peers.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub similar: Vec<Product>,
}

/// Read-only catalog operations.
pub struct CatalogService<'a> {
    client: &'a CatalogClient,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(client: &'a CatalogClient) -> Self {
        Self { client }
    }

    /// Load the full product set into a fresh browser.
    ///
    /// A failed load is logged and yields an empty catalog.
    pub async fn browser(&self) -> CatalogBrowser {
        match self.client.all_products().await {
            Ok(products) => CatalogBrowser::new(products.as_ref().clone()),
            Err(e) => {
                warn!(error = %e, "Failed to load catalog, showing empty listing");
                CatalogBrowser::new(Vec::new())
            }
        }
    }

    /// The browse listing narrowed by `query`.
    #[instrument(skip(self))]
    pub async fn browse(&self, query: &BrowseQuery) -> BrowsePage {
        let mut browser = self.browser().await;

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());

        let suggestions = match search {
            Some(q) => browser.search(q),
            None => {
                let filter = query
                    .category
                    .as_deref()
                    .map_or(CategoryFilter::All, CategoryFilter::from_label);
                browser.select_category(filter);
                Vec::new()
            }
        };

        let page = browser.paginate(query.page.unwrap_or(1));

        BrowsePage {
            categories: browser.categories().to_vec(),
            selected_category: browser.filter().clone(),
            query: browser.query().to_string(),
            suggestions,
            page,
        }
    }

    /// The first page of the default listing.
    ///
    /// A failed load is logged and yields no products.
    #[instrument(skip(self))]
    pub async fn featured(&self) -> Vec<Product> {
        match self.client.list(None).await {
            Ok(products) => products.iter().take(PAGE_SIZE).cloned().collect(),
            Err(e) => {
                warn!(error = %e, "Failed to load featured products");
                Vec::new()
            }
        }
    }

    /// Distinct category labels in first-seen order.
    pub async fn categories(&self) -> Vec<String> {
        self.browser().await.categories().to_vec()
    }

    /// Up to five title matches for a search box.
    pub async fn suggest(&self, query: &str) -> Vec<Product> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.browser().await.suggestions(query)
    }

    /// One product and up to eight others from the same category.
    ///
    /// If the full listing cannot be loaded the product is still returned
    /// without peers.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id, or another
    /// `CatalogError` if the product cannot be fetched.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn detail(&self, id: ProductId) -> Result<ProductDetail, CatalogError> {
        let product = self.client.product(id).await?;

        let similar = match self.client.all_products().await {
            Ok(all) => all
                .iter()
                .filter(|p| p.category == product.category && p.id != product.id)
                .take(PAGE_SIZE)
                .cloned()
                .collect(),
            Err(e) => {
                warn!(error = %e, "Failed to load similar products");
                Vec::new()
            }
        };

        Ok(ProductDetail { product, similar })
    }
}
