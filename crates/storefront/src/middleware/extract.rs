//! Request extractors that reject with the JSON error body.
//!
//! Axum's own `Path`, `Query` and `Json` reject with a plain-text body.
//! These wrappers route the rejection through [`AppError`] so malformed ids,
//! query strings and bodies get `{"error": ...}` like every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// Path parameters, e.g. `PathParams(id): PathParams<ProductId>`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParams<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
