//! Subcommand implementations. Each one builds a service from the
//! [`Context`](crate::context::Context) and prints through its `Output`.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod comments;
