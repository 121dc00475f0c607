//! Cart operations and the hydrated cart view.

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{info, instrument};

use cornershop_core::{Money, ProductId, Quantity, ShippingOption};

use crate::catalog::{CatalogClient, CatalogError, Product};
use crate::models::{Cart, Identity};
use crate::store::{CartStore, IdentityStore, KeyValueStore, StoreError};

/// Message returned by a successful checkout.
pub const CHECKOUT_MESSAGE: &str = "Thank you for your purchase!";

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No one is logged in.
    #[error("please log in to use the cart")]
    LoginRequired,

    /// The product has no line in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The catalog has no such product.
    #[error("product {0} does not exist")]
    UnknownProduct(ProductId),

    /// Checkout with nothing in the cart.
    #[error("your cart is empty")]
    EmptyCart,

    /// Checkout without a shipping address.
    #[error("a shipping address is required")]
    MissingAddress,

    /// Product lookup failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Local store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A cart entry joined with its product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    pub quantity: Quantity,
    #[serde(serialize_with = "two_decimals")]
    pub line_total: Money,
}

/// Totals for the loaded cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    #[serde(serialize_with = "two_decimals")]
    pub subtotal: Money,
    #[serde(serialize_with = "two_decimals")]
    pub shipping: Money,
    #[serde(serialize_with = "two_decimals")]
    pub total: Money,
}

impl CartSummary {
    /// Sum price x quantity over `lines`, then add the shipping cost.
    #[must_use]
    pub fn compute(lines: &[CartLine], shipping: ShippingOption) -> Self {
        let subtotal: Money = lines.iter().map(|line| line.line_total).sum();
        let shipping = shipping.cost();
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

/// The cart page: hydrated lines plus summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub shipping_option: ShippingOption,
    pub summary: CartSummary,
    /// Total units across all lines.
    pub item_count: u64,
}

impl CartView {
    fn new(lines: Vec<CartLine>, shipping_option: ShippingOption) -> Self {
        let summary = CartSummary::compute(&lines, shipping_option);
        let item_count = lines.iter().map(|l| u64::from(l.quantity.get())).sum();
        Self {
            lines,
            shipping_option,
            summary,
            item_count,
        }
    }

    /// True when there are no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Result of a checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutConfirmation {
    pub message: &'static str,
    pub address: String,
    #[serde(serialize_with = "two_decimals")]
    pub total: Money,
}

fn two_decimals<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&money.display())
}

/// Cart service.
///
/// Every operation except [`CartService::count`] requires a logged-in user.
pub struct CartService<'a> {
    catalog: &'a CatalogClient,
    identities: IdentityStore<'a>,
    carts: CartStore<'a>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(kv: &'a dyn KeyValueStore, catalog: &'a CatalogClient) -> Self {
        Self {
            catalog,
            identities: IdentityStore::new(kv),
            carts: CartStore::new(kv),
        }
    }

    fn require_user(&self) -> Result<Identity, CartError> {
        self.identities.current()?.ok_or(CartError::LoginRequired)
    }

    /// Resolve every entry against the catalog.
    ///
    /// All-or-nothing: one failed lookup discards every line.
    async fn hydrate(&self, cart: &Cart, shipping: ShippingOption) -> Result<CartView, CartError> {
        let ids: Vec<ProductId> = cart.entries().iter().map(|e| e.product_id).collect();
        let products = self.catalog.products(&ids).await?;

        let lines = cart
            .entries()
            .iter()
            .zip(products)
            .map(|(entry, product)| CartLine {
                line_total: product.price * entry.quantity,
                quantity: entry.quantity,
                product,
            })
            .collect();

        Ok(CartView::new(lines, shipping))
    }

    /// The hydrated cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LoginRequired` if no one is logged in, or
    /// `CartError::Catalog` if any product lookup fails.
    #[instrument(skip(self))]
    pub async fn view(&self, shipping: ShippingOption) -> Result<CartView, CartError> {
        self.require_user()?;
        let cart = self.carts.load()?;
        self.hydrate(&cart, shipping).await
    }

    /// Add one unit of a product. Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LoginRequired` if no one is logged in, or
    /// `CartError::UnknownProduct` if the catalog has no such product.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add(&self, product_id: ProductId) -> Result<Quantity, CartError> {
        self.require_user()?;

        self.catalog.product(product_id).await.map_err(|e| match e {
            CatalogError::NotFound(id) => CartError::UnknownProduct(id),
            other => CartError::Catalog(other),
        })?;

        let quantity = self
            .carts
            .update(|cart| Ok::<_, CartError>(cart.add(product_id)))?;

        info!(quantity = quantity.get(), "Added to cart");
        Ok(quantity)
    }

    /// Overwrite a line's quantity and return the refreshed cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LoginRequired` if no one is logged in, or
    /// `CartError::NotInCart` if the product has no line.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn set_quantity(
        &self,
        product_id: ProductId,
        quantity: Quantity,
        shipping: ShippingOption,
    ) -> Result<CartView, CartError> {
        self.require_user()?;

        let cart = self.carts.update(|cart| {
            if !cart.set_quantity(product_id, quantity) {
                return Err(CartError::NotInCart(product_id));
            }
            Ok(cart.clone())
        })?;

        self.hydrate(&cart, shipping).await
    }

    /// Drop a line and return the refreshed cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LoginRequired` if no one is logged in, or
    /// `CartError::NotInCart` if the product has no line.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(
        &self,
        product_id: ProductId,
        shipping: ShippingOption,
    ) -> Result<CartView, CartError> {
        self.require_user()?;

        let cart = self.carts.update(|cart| {
            if !cart.remove(product_id) {
                return Err(CartError::NotInCart(product_id));
            }
            Ok(cart.clone())
        })?;

        self.hydrate(&cart, shipping).await
    }

    /// Total units in the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the stored cart is corrupt.
    pub fn count(&self) -> Result<u64, CartError> {
        Ok(self.carts.load()?.total_quantity())
    }

    /// Confirm a purchase. The cart is left as it is and no order is kept.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MissingAddress` for a blank address,
    /// `CartError::EmptyCart` for an empty cart, or a hydration error.
    #[instrument(skip(self, address))]
    pub async fn checkout(
        &self,
        address: &str,
        shipping: ShippingOption,
    ) -> Result<CheckoutConfirmation, CartError> {
        self.require_user()?;

        let address = address.trim();
        if address.is_empty() {
            return Err(CartError::MissingAddress);
        }

        let cart = self.carts.load()?;
        if cart.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let view = self.hydrate(&cart, shipping).await?;

        info!(total = %view.summary.total, "Checkout confirmed");
        Ok(CheckoutConfirmation {
            message: CHECKOUT_MESSAGE,
            address: address.to_string(),
            total: view.summary.total,
        })
    }
}
