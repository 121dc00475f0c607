//! Cornershop Core - Shared types library.
//!
//! This crate provides common types used across all Cornershop components:
//! - `storefront` - Local storefront library and HTTP server
//! - `cli` - Command-line client over the same services
//!
//! # Architecture
//!
//! The core crate contains only types and pure arithmetic - no I/O, no
//! persistence, no HTTP clients. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, money, quantities, emails and shipping

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
