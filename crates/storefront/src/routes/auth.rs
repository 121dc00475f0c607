//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{JsonBody, OptionalUser};
use crate::models::{Identity, SessionState};
use crate::services::Registration;
use crate::state::AppState;

/// An identity without its password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&Identity> for UserView {
    fn from(identity: &Identity) -> Self {
        Self {
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            email: identity.email.to_string(),
        }
    }
}

/// Session state as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub authenticated: bool,
    pub user: Option<UserView>,
}

impl From<&SessionState> for SessionView {
    fn from(state: &SessionState) -> Self {
        Self {
            authenticated: state.is_authenticated(),
            user: state.identity().map(UserView::from),
        }
    }
}

impl SessionView {
    #[must_use]
    pub fn from_current(user: Option<&Identity>) -> Self {
        Self {
            authenticated: user.is_some(),
            user: user.map(UserView::from),
        }
    }
}

/// Registration form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Response after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub session: SessionView,
    /// Where the client should go next.
    pub redirect: &'static str,
}

/// Current session state.
pub async fn session(OptionalUser(user): OptionalUser) -> Json<SessionView> {
    Json(SessionView::from_current(user.as_ref()))
}

/// Register a new identity. Does not log in.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RegisterForm>,
) -> Result<(StatusCode, Json<UserView>)> {
    let registration = Registration {
        first_name: form.first_name,
        last_name: form.last_name,
        email: form.email,
        password: SecretString::from(form.password),
        confirm_password: SecretString::from(form.confirm_password),
    };

    let identity = state.auth().register(&registration)?;
    Ok((StatusCode::CREATED, Json(UserView::from(&identity))))
}

/// Log in and send the client to the catalog.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<LoginForm>,
) -> Result<Json<LoginResponse>> {
    let password = SecretString::from(form.password);
    let identity = state.auth().login(&form.email, &password)?;

    set_sentry_user(identity.email.as_str());

    Ok(Json(LoginResponse {
        session: SessionView::from_current(Some(&identity)),
        redirect: "/products",
    }))
}

/// Log out: forget the current user and the cart.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<Json<SessionView>> {
    state.auth().logout()?;
    clear_sentry_user();
    Ok(Json(SessionView::from(&SessionState::Anonymous)))
}
