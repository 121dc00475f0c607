//! Shared state for one CLI invocation.

use std::sync::Arc;

use thiserror::Error;

use cornershop_storefront::catalog::CatalogError;
use cornershop_storefront::config::{ConfigError, StorefrontConfig};
use cornershop_storefront::state::AppState;
use cornershop_storefront::store::{FileStore, StoreError};

use crate::output::Output;

/// Errors that can occur while setting up a command.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot open local store: {0}")]
    Store(#[from] StoreError),

    #[error("cannot create product API client: {0}")]
    Catalog(#[from] CatalogError),
}

/// The storefront state plus output settings.
pub struct Context {
    state: AppState,
    output: Output,
}

impl Context {
    /// Load configuration from the environment (and `.env`).
    ///
    /// # Errors
    ///
    /// Returns `ContextError` if configuration is invalid or the store
    /// file is unreadable.
    pub fn from_env(json: bool) -> Result<Self, ContextError> {
        Self::new(&StorefrontConfig::from_env()?, json)
    }

    /// Open the store named by `config` and build the services over it.
    ///
    /// # Errors
    ///
    /// Returns `ContextError` if the store file is unreadable or the HTTP
    /// client cannot be built.
    pub fn new(config: &StorefrontConfig, json: bool) -> Result<Self, ContextError> {
        let store = FileStore::open(&config.data_path)?;
        tracing::debug!(path = %config.data_path.display(), "Local store opened");

        let state = AppState::new(config, Arc::new(store))?;
        Ok(Self {
            state,
            output: Output::new(json),
        })
    }

    pub const fn state(&self) -> &AppState {
        &self.state
    }

    pub const fn output(&self) -> &Output {
        &self.output
    }
}
