//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! The current user is not middleware: handlers opt in through the
//! [`RequireUser`] and [`OptionalUser`] extractors. Handlers take their
//! path, query and body through [`PathParams`], [`QueryParams`] and
//! [`JsonBody`].

pub mod auth;
pub mod extract;
pub mod request_id;

pub use auth::{AuthRejection, OptionalUser, RequireUser};
pub use extract::{JsonBody, PathParams, QueryParams};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
