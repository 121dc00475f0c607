//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Error bodies are JSON: `{"error": "<message>"}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::services::{AuthError, CartError, CommentError};
use crate::store::StoreError;

/// Where clients are sent when a login is required.
pub const LOGIN_PATH: &str = "/auth/login";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Local store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Product API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Comment operation failed.
    #[error("Comment error: {0}")]
    Comment(#[from] CommentError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Catalog(err) => catalog_status(err),
            Self::Auth(err) => match err {
                AuthError::MissingField(_)
                | AuthError::PasswordMismatch
                | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::PasswordHash | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Cart(err) => match err {
                CartError::LoginRequired => StatusCode::UNAUTHORIZED,
                CartError::NotInCart(_) | CartError::UnknownProduct(_) => StatusCode::NOT_FOUND,
                CartError::EmptyCart | CartError::MissingAddress => StatusCode::BAD_REQUEST,
                CartError::Catalog(err) => catalog_status(err),
                CartError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Comment(err) => match err {
                CommentError::Empty => StatusCode::BAD_REQUEST,
                CommentError::NotFound { .. } => StatusCode::NOT_FOUND,
                CommentError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn requires_login(&self) -> bool {
        matches!(self, Self::Cart(CartError::LoginRequired))
    }

    /// Message safe to show to the client.
    fn public_message(&self) -> String {
        match self {
            Self::Store(_) => "Internal server error".to_string(),
            Self::Catalog(CatalogError::NotFound(id))
            | Self::Cart(CartError::Catalog(CatalogError::NotFound(id))) => {
                format!("Product {id} not found")
            }
            Self::Catalog(_) | Self::Cart(CartError::Catalog(_)) => {
                "Product service unavailable".to_string()
            }
            Self::Auth(AuthError::PasswordHash | AuthError::Store(_))
            | Self::Cart(CartError::Store(_))
            | Self::Comment(CommentError::Store(_)) => "Internal server error".to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Comment(err) => err.to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

const fn catalog_status(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Json(json!({ "error": self.public_message() }));
        let mut response = (status, body).into_response();

        if self.requires_login() {
            response
                .headers_mut()
                .insert(header::LOCATION, HeaderValue::from_static(LOGIN_PATH));
        }

        response
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the logged-in email.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
