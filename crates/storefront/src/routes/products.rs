//! Product route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use cornershop_core::ProductId;

use crate::catalog::Product;
use crate::error::Result;
use crate::middleware::{JsonBody, PathParams, QueryParams};
use crate::services::{BrowsePage, BrowseQuery};
use crate::state::AppState;

/// Browse query parameters.
#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    pub category: Option<String>,
    pub q: Option<String>,
    pub page: Option<usize>,
}

/// Suggestion query parameters.
#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
}

/// Product detail page data.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub product: Product,
    pub similar: Vec<Product>,
    pub comments: Vec<String>,
}

/// New comment body.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

/// Product listing with category filter, search and pagination.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<BrowseParams>,
) -> Json<BrowsePage> {
    let query = BrowseQuery {
        category: params.category,
        search: params.q,
        page: params.page,
    };
    Json(state.catalog_pages().browse(&query).await)
}

/// Category labels.
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog_pages().categories().await)
}

/// Search-box suggestions.
pub async fn suggest(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SuggestParams>,
) -> Json<Vec<Product>> {
    Json(state.catalog_pages().suggest(&params.q).await)
}

/// Product detail with similar products and comments.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    PathParams(id): PathParams<ProductId>,
) -> Result<Json<ProductPage>> {
    let detail = state.catalog_pages().detail(id).await?;
    let comments = state.comments().list(id)?;

    Ok(Json(ProductPage {
        product: detail.product,
        similar: detail.similar,
        comments,
    }))
}

/// Append a comment; returns the full list.
#[instrument(skip(state, form), fields(product_id = %id))]
pub async fn add_comment(
    State(state): State<AppState>,
    PathParams(id): PathParams<ProductId>,
    JsonBody(form): JsonBody<CommentForm>,
) -> Result<Json<Vec<String>>> {
    Ok(Json(state.comments().add(id, &form.text)?))
}

/// Delete a comment by position; returns the full list.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn remove_comment(
    State(state): State<AppState>,
    PathParams((id, index)): PathParams<(ProductId, usize)>,
) -> Result<Json<Vec<String>>> {
    Ok(Json(state.comments().remove(id, index)?))
}
