//! Cart commands.

use cornershop_core::{ProductId, Quantity, ShippingOption};
use cornershop_storefront::routes::cart::{AddItemResponse, CountResponse};

use crate::context::Context;
use crate::output;

/// Show the hydrated cart.
///
/// # Errors
///
/// Returns `CartError::LoginRequired` when logged out, or a catalog error.
pub async fn show(ctx: &Context, shipping: ShippingOption) -> Result<(), Box<dyn std::error::Error>> {
    let view = ctx.state().cart().view(shipping).await?;
    ctx.output().emit(&view, || output::cart_view(&view))?;
    Ok(())
}

/// Add one unit.
///
/// # Errors
///
/// Returns `CartError::LoginRequired` when logged out or
/// `CartError::UnknownProduct` for an id the catalog does not have.
pub async fn add(ctx: &Context, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let cart = ctx.state().cart();
    let quantity = cart.add(id).await?;
    let count = cart.count()?;

    let response = AddItemResponse {
        product_id: id,
        quantity,
        count,
    };
    ctx.output().emit(&response, || {
        format!("Added product {id} (now {quantity} in cart, {count} items total).")
    })?;
    Ok(())
}

/// Set a line's quantity from raw user input.
///
/// # Errors
///
/// Returns `CartError::NotInCart` if the product has no line.
pub async fn set(
    ctx: &Context,
    id: ProductId,
    quantity: &str,
    shipping: ShippingOption,
) -> Result<(), Box<dyn std::error::Error>> {
    let quantity = Quantity::from_input(quantity);
    let view = ctx.state().cart().set_quantity(id, quantity, shipping).await?;
    ctx.output().emit(&view, || output::cart_view(&view))?;
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns `CartError::NotInCart` if the product has no line.
pub async fn remove(
    ctx: &Context,
    id: ProductId,
    shipping: ShippingOption,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = ctx.state().cart().remove(id, shipping).await?;
    ctx.output().emit(&view, || output::cart_view(&view))?;
    Ok(())
}

/// Print the number of items in the cart.
///
/// # Errors
///
/// Returns a store error if the stored cart is corrupt.
pub fn count(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let count = ctx.state().cart().count()?;
    ctx.output()
        .emit(&CountResponse { count }, || count.to_string())?;
    Ok(())
}

/// Confirm the purchase.
///
/// # Errors
///
/// Returns `CartError::MissingAddress` or `CartError::EmptyCart` on invalid
/// input.
pub async fn checkout(
    ctx: &Context,
    address: &str,
    shipping: ShippingOption,
) -> Result<(), Box<dyn std::error::Error>> {
    let confirmation = ctx.state().cart().checkout(address, shipping).await?;
    ctx.output().emit(&confirmation, || {
        format!(
            "{}\nShipping to: {}\nTotal charged: {}",
            confirmation.message, confirmation.address, confirmation.total
        )
    })?;
    Ok(())
}
