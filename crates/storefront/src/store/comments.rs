//! Per-product comment lists.

use cornershop_core::ProductId;

use super::{KeyValueStore, StoreError, keys, read_json, update_json};

/// Typed access to the `comments-<productId>` keys.
pub struct CommentStore<'a> {
    kv: &'a dyn KeyValueStore,
}

impl<'a> CommentStore<'a> {
    /// Create a repository over `kv`.
    #[must_use]
    pub const fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self { kv }
    }

    /// Comments for one product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the stored list does not decode.
    pub fn list(&self, product_id: ProductId) -> Result<Vec<String>, StoreError> {
        Ok(read_json(self.kv, &keys::comments(product_id))?.unwrap_or_default())
    }

    /// Apply `change` to the comment list of one product under the store
    /// lock. Nothing is written when `change` fails.
    ///
    /// # Errors
    ///
    /// Returns the error of `change`, or a `StoreError` converted into `E`.
    pub fn update<R, E>(
        &self,
        product_id: ProductId,
        change: impl FnOnce(&mut Vec<String>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        update_json(self.kv, &keys::comments(product_id), change)
    }
}
