//! Cart repository.

use super::{KeyValueStore, StoreError, keys, read_json, update_json};
use crate::models::Cart;

/// Typed access to the `cart` key.
pub struct CartStore<'a> {
    kv: &'a dyn KeyValueStore,
}

impl<'a> CartStore<'a> {
    /// Create a repository over `kv`.
    #[must_use]
    pub const fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self { kv }
    }

    /// Load the cart. A missing key is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the stored list does not decode.
    pub fn load(&self) -> Result<Cart, StoreError> {
        Ok(read_json(self.kv, keys::CART)?.unwrap_or_default())
    }

    /// Apply `change` to the stored cart under the store lock.
    ///
    /// Nothing is written when `change` fails.
    ///
    /// # Errors
    ///
    /// Returns the error of `change`, or a `StoreError` converted into `E`.
    pub fn update<R, E>(&self, change: impl FnOnce(&mut Cart) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        update_json(self.kv, keys::CART, change)
    }

    /// Delete the cart entirely.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be written.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.kv.remove(keys::CART)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cornershop_core::ProductId;

    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_round_trip_and_clear() {
        let kv = MemoryStore::new();
        let store = CartStore::new(&kv);
        assert!(store.load().unwrap().is_empty());

        let cart = store
            .update(|cart| {
                cart.add(ProductId::new(3));
                Ok::<_, StoreError>(cart.clone())
            })
            .unwrap();
        assert_eq!(store.load().unwrap(), cart);

        store.clear().unwrap();
        assert!(kv.get(keys::CART).unwrap().is_none());
    }

    #[test]
    fn test_zero_quantity_in_store_loads_as_one() {
        let kv = MemoryStore::new();
        kv.set(keys::CART, r#"[{"id":5,"quantity":0}]"#.to_string())
            .unwrap();

        let cart = CartStore::new(&kv).load().unwrap();
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn test_entry_without_quantity_is_corrupt() {
        let kv = MemoryStore::new();
        kv.set(keys::CART, r#"[{"id":5}]"#.to_string()).unwrap();

        assert!(matches!(
            CartStore::new(&kv).load(),
            Err(StoreError::Corrupt { .. })
        ));
    }
}
