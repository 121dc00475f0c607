//! Cart route handlers.
//!
//! Every handler except `count` requires a logged-in user; anonymous
//! requests get 401 with `location: /auth/login`.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use cornershop_core::{ProductId, Quantity, ShippingOption};

use crate::error::{AppError, Result};
use crate::middleware::{JsonBody, PathParams, QueryParams, RequireUser};
use crate::services::{CartView, CheckoutConfirmation};
use crate::state::AppState;

/// `?shipping=` on cart pages. Missing means standard.
#[derive(Debug, Deserialize)]
pub struct ShippingParams {
    pub shipping: Option<String>,
}

impl ShippingParams {
    fn option(&self) -> Result<ShippingOption> {
        parse_shipping(self.shipping.as_deref())
    }
}

fn parse_shipping(value: Option<&str>) -> Result<ShippingOption> {
    match value {
        None => Ok(ShippingOption::default()),
        Some(s) => s
            .parse()
            .map_err(|e: cornershop_core::UnknownShippingOption| AppError::BadRequest(e.to_string())),
    }
}

/// Add-to-cart body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemForm {
    pub product_id: ProductId,
}

/// Quantity as typed by the user: a number, a numeric string, or anything
/// else (which counts as 1).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl From<QuantityInput> for Quantity {
    fn from(input: QuantityInput) -> Self {
        match input {
            QuantityInput::Number(n) => Self::clamped(n),
            QuantityInput::Text(s) => Self::from_input(&s),
            QuantityInput::Other(_) => Self::ONE,
        }
    }
}

/// Set-quantity body.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub quantity: QuantityInput,
}

/// Checkout body.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub address: String,
    pub shipping: Option<String>,
}

/// Result of adding to the cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemResponse {
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// Total units in the cart afterwards.
    pub count: u64,
}

/// Navbar badge value.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Hydrated cart with summary.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    _user: RequireUser,
    QueryParams(params): QueryParams<ShippingParams>,
) -> Result<Json<CartView>> {
    let shipping = params.option()?;
    Ok(Json(state.cart().view(shipping).await?))
}

/// Total units in the cart. Does not require a login.
pub async fn count(State(state): State<AppState>) -> Result<Json<CountResponse>> {
    Ok(Json(CountResponse {
        count: state.cart().count()?,
    }))
}

/// Add one unit of a product.
#[instrument(skip_all, fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    _user: RequireUser,
    JsonBody(form): JsonBody<AddItemForm>,
) -> Result<Json<AddItemResponse>> {
    let cart = state.cart();
    let quantity = cart.add(form.product_id).await?;

    Ok(Json(AddItemResponse {
        product_id: form.product_id,
        quantity,
        count: cart.count()?,
    }))
}

/// Overwrite a line's quantity (minimum 1).
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    _user: RequireUser,
    PathParams(id): PathParams<ProductId>,
    QueryParams(params): QueryParams<ShippingParams>,
    JsonBody(form): JsonBody<QuantityForm>,
) -> Result<Json<CartView>> {
    let shipping = params.option()?;
    let quantity = Quantity::from(form.quantity);
    Ok(Json(state.cart().set_quantity(id, quantity, shipping).await?))
}

/// Drop a line.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn remove(
    State(state): State<AppState>,
    _user: RequireUser,
    PathParams(id): PathParams<ProductId>,
    QueryParams(params): QueryParams<ShippingParams>,
) -> Result<Json<CartView>> {
    let shipping = params.option()?;
    Ok(Json(state.cart().remove(id, shipping).await?))
}

/// Confirm the purchase. The cart is kept.
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    _user: RequireUser,
    JsonBody(form): JsonBody<CheckoutForm>,
) -> Result<Json<CheckoutConfirmation>> {
    let shipping = parse_shipping(form.shipping.as_deref())?;
    Ok(Json(state.cart().checkout(&form.address, shipping).await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn quantity(json: &str) -> Quantity {
        let form: QuantityForm = serde_json::from_str(json).unwrap();
        Quantity::from(form.quantity)
    }

    #[test]
    fn test_quantity_input() {
        assert_eq!(quantity(r#"{"quantity": 4}"#).get(), 4);
        assert_eq!(quantity(r#"{"quantity": 0}"#).get(), 1);
        assert_eq!(quantity(r#"{"quantity": -3}"#).get(), 1);
        assert_eq!(quantity(r#"{"quantity": "7"}"#).get(), 7);
        assert_eq!(quantity(r#"{"quantity": "lots"}"#).get(), 1);
        assert_eq!(quantity(r#"{"quantity": null}"#).get(), 1);
    }

    #[test]
    fn test_parse_shipping() {
        assert_eq!(parse_shipping(None).unwrap(), ShippingOption::Standard);
        assert_eq!(
            parse_shipping(Some("Express")).unwrap(),
            ShippingOption::Express
        );
        assert!(parse_shipping(Some("teleport")).is_err());
    }
}
