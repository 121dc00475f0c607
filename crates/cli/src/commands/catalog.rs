//! Catalog browsing commands.

use cornershop_core::ProductId;
use cornershop_storefront::routes::products::ProductPage;
use cornershop_storefront::services::BrowseQuery;

use crate::context::Context;
use crate::output;

/// Show featured products.
///
/// # Errors
///
/// Returns an error only if output fails; an unreachable catalog prints an
/// empty list.
pub async fn featured(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let products = ctx.state().catalog_pages().featured().await;
    ctx.output()
        .emit(&products, || output::product_table(&products))?;
    Ok(())
}

/// Browse with an optional category filter or search.
///
/// # Errors
///
/// Returns an error only if output fails.
pub async fn products(
    ctx: &Context,
    category: Option<String>,
    search: Option<String>,
    page: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = BrowseQuery {
        category,
        search,
        page: Some(page),
    };
    let page = ctx.state().catalog_pages().browse(&query).await;
    ctx.output().emit(&page, || output::browse_page(&page))?;
    Ok(())
}

/// List category labels.
///
/// # Errors
///
/// Returns an error only if output fails.
pub async fn categories(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let categories = ctx.state().catalog_pages().categories().await;
    ctx.output().emit(&categories, || categories.join("\n"))?;
    Ok(())
}

/// Show one product.
///
/// # Errors
///
/// Returns `CatalogError::NotFound` for an unknown id, or a network error.
pub async fn product(ctx: &Context, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let detail = ctx.state().catalog_pages().detail(id).await?;
    let comments = ctx.state().comments().list(id)?;

    let page = ProductPage {
        product: detail.product,
        similar: detail.similar,
        comments,
    };
    ctx.output().emit(&page, || output::product_page(&page))?;
    Ok(())
}
