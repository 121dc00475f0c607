//! Home page route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use super::auth::SessionView;
use crate::catalog::Product;
use crate::middleware::OptionalUser;
use crate::state::AppState;

/// Home page data.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub session: SessionView,
    pub featured: Vec<Product>,
}

/// Featured products and the session state for the navigation bar.
#[instrument(skip_all)]
pub async fn home(State(state): State<AppState>, OptionalUser(user): OptionalUser) -> Json<HomePage> {
    let featured = state.catalog_pages().featured().await;

    Json(HomePage {
        session: SessionView::from_current(user.as_ref()),
        featured,
    })
}
