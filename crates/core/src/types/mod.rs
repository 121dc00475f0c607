//! Core types for Cornershop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod quantity;
pub mod shipping;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Money;
pub use quantity::Quantity;
pub use shipping::{ShippingOption, UnknownShippingOption};
