//! Current-user extractors.
//!
//! The logged-in user is the `user` record in the shared key-value store,
//! so these extractors read it from [`AppState`] on every request.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::{AppError, LOGIN_PATH};
use crate::models::Identity;
use crate::state::AppState;
use crate::store::{IdentityStore, StoreError};

/// Extractor that requires a logged-in user.
///
/// If no one is logged in, the request is rejected with 401 and a
/// `location` header pointing at the login endpoint.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.first_name)
/// }
/// ```
pub struct RequireUser(pub Identity);

/// Error returned when a user is required but cannot be loaded.
#[derive(Debug)]
pub enum AuthRejection {
    /// No current user is stored.
    LoginRequired,
    /// The stored current user could not be read.
    Store(StoreError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::LoginRequired => {
                let mut response = (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "please log in to continue" })),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::LOCATION, HeaderValue::from_static(LOGIN_PATH));
                response
            }
            Self::Store(err) => AppError::Store(err).into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = IdentityStore::new(state.store())
            .current()
            .map_err(AuthRejection::Store)?
            .ok_or(AuthRejection::LoginRequired)?;

        tracing::Span::current().record("user", user.email.as_str());
        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this does not reject anonymous requests. A corrupt
/// stored record still fails the request.
pub struct OptionalUser(pub Option<Identity>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = IdentityStore::new(state.store())
            .current()
            .map_err(AuthRejection::Store)?;
        Ok(Self(user))
    }
}
