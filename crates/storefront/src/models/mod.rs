//! Domain models for the storefront.
//!
//! These are the values that the store repositories persist and that the
//! services operate on. Catalog products live in [`crate::catalog`] since
//! they are owned by the remote API.

pub mod cart;
pub mod identity;

pub use cart::{Cart, CartEntry};
pub use identity::{Identity, SessionState};
