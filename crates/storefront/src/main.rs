//! Cornershop storefront - local JSON storefront server.
//!
//! Serves the storefront on port 3000 by default.
//!
//! # Architecture
//!
//! - Axum web framework, JSON responses
//! - Remote product API (dummyjson shape) for the catalog, cached with moka
//! - A JSON file on local disk for identities, the current user, the cart
//!   and comments (shared with `cs-cli`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use cornershop_storefront::config::StorefrontConfig;
use cornershop_storefront::state::AppState;
use cornershop_storefront::store::FileStore;
use cornershop_storefront::telemetry;

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = telemetry::init_sentry(&config);

    telemetry::init_tracing("cornershop_storefront=info,tower_http=debug", config.log_json);

    let store = FileStore::open(&config.data_path).expect("Failed to open local store");
    tracing::info!(path = %config.data_path.display(), "Local store opened");

    let state = AppState::new(&config, Arc::new(store))
        .expect("Failed to initialize application state");

    let app = cornershop_storefront::app(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
