//! In-memory browse state: category filter, title search and pagination.
//!
//! Holds no I/O. [`CatalogService`](super::catalog::CatalogService) loads the
//! product set and hands it to a fresh browser per request or command.

use core::fmt;

use serde::{Serialize, Serializer};

use crate::catalog::Product;

/// Products per page, also the cap on "similar products".
pub const PAGE_SIZE: usize = 8;

/// Maximum number of search suggestions.
pub const SUGGESTION_LIMIT: usize = 5;

/// The selected category, or no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Label used by the filter control. `"All"` (any case) and blank input
    /// mean no filter.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Category(label.to_string())
        }
    }

    /// The label shown for this filter.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Category(label) => label,
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(label) => product.category == *label,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub active: bool,
}

/// One page of the filtered product set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub items: Vec<Product>,
    /// 1-based page number.
    pub page: usize,
    pub total_pages: usize,
    /// Size of the whole filtered set.
    pub total_items: usize,
    pub links: Vec<PageLink>,
}

/// Browse state over a loaded product set.
#[derive(Debug, Clone)]
pub struct CatalogBrowser {
    all: Vec<Product>,
    filtered: Vec<Product>,
    categories: Vec<String>,
    filter: CategoryFilter,
    query: String,
    page: usize,
}

impl CatalogBrowser {
    /// Start on page 1 with no filter. Categories keep first-seen order.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for product in &products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }

        Self {
            filtered: products.clone(),
            all: products,
            categories,
            filter: CategoryFilter::All,
            query: String::new(),
            page: 1,
        }
    }

    /// Distinct category labels, first-seen order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The active category filter.
    #[must_use]
    pub const fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// The active search query, empty when not searching.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The current 1-based page.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// The working set after filtering or searching.
    #[must_use]
    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    /// Number of pages over the working set.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(PAGE_SIZE)
    }

    /// Filter by exact category label, or reset with [`CategoryFilter::All`].
    /// Clears any search and returns to page 1.
    pub fn select_category(&mut self, filter: CategoryFilter) {
        self.filtered = self
            .all
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        self.filter = filter;
        self.query.clear();
        self.page = 1;
    }

    /// Case-insensitive title search over the full set.
    ///
    /// The whole match set becomes the working set and the browser returns
    /// to page 1. A blank query resets to the full set. Returns up to
    /// [`SUGGESTION_LIMIT`] matches for a suggestion list.
    pub fn search(&mut self, query: &str) -> Vec<Product> {
        let query = query.trim();
        self.filter = CategoryFilter::All;
        self.page = 1;

        if query.is_empty() {
            self.query.clear();
            self.filtered.clone_from(&self.all);
            return Vec::new();
        }

        self.query = query.to_string();
        self.filtered = matching(&self.all, query).cloned().collect();
        self.filtered
            .iter()
            .take(SUGGESTION_LIMIT)
            .cloned()
            .collect()
    }

    /// Up to [`SUGGESTION_LIMIT`] title matches without changing state.
    #[must_use]
    pub fn suggestions(&self, query: &str) -> Vec<Product> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        matching(&self.all, query)
            .take(SUGGESTION_LIMIT)
            .cloned()
            .collect()
    }

    /// Move to `page` (0 is treated as 1) and return it.
    ///
    /// Pages past the end are empty but still report the requested number.
    pub fn paginate(&mut self, page: usize) -> PageView {
        self.page = page.max(1);
        self.current_page()
    }

    /// The page the browser is on.
    #[must_use]
    pub fn current_page(&self) -> PageView {
        let total_pages = self.total_pages();
        let start = self.page.saturating_sub(1).saturating_mul(PAGE_SIZE);
        let items = self
            .filtered
            .iter()
            .skip(start)
            .take(PAGE_SIZE)
            .cloned()
            .collect();

        PageView {
            items,
            page: self.page,
            total_pages,
            total_items: self.filtered.len(),
            links: (1..=total_pages)
                .map(|number| PageLink {
                    number,
                    active: number == self.page,
                })
                .collect(),
        }
    }
}

fn matching<'p>(products: &'p [Product], query: &str) -> impl Iterator<Item = &'p Product> {
    let needle = query.to_lowercase();
    products
        .iter()
        .filter(move |p| p.title.to_lowercase().contains(&needle))
}
