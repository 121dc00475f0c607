//! Local key-value persistence.
//!
//! # Keys
//!
//! Every value is a JSON document stored under a fixed string key:
//!
//! - `users` - list of registered identities
//! - `user` - the identity currently logged in, absent when anonymous
//! - `cart` - list of `{"id": <productId>, "quantity": n}` entries
//! - `comments-<productId>` - list of comment strings for one product
//!
//! # Layers
//!
//! [`KeyValueStore`] is the raw string store (a file on disk, or memory in
//! tests). The typed repositories ([`IdentityStore`], [`CartStore`],
//! [`CommentStore`]) own the keys above and decode at the boundary, so a
//! malformed value surfaces as [`StoreError::Corrupt`] instead of leaking
//! half-parsed data into the services.

mod cart;
mod comments;
mod file;
mod identities;
mod memory;

pub use cart::CartStore;
pub use comments::CommentStore;
pub use file::FileStore;
pub use identities::IdentityStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Fixed store keys.
pub mod keys {
    use cornershop_core::ProductId;

    /// Registered identities.
    pub const USERS: &str = "users";

    /// Currently logged-in identity.
    pub const CURRENT_USER: &str = "user";

    /// Cart entries.
    pub const CART: &str = "cart";

    /// Key holding the comments of one product.
    #[must_use]
    pub fn comments(product_id: ProductId) -> String {
        format!("comments-{product_id}")
    }
}

/// Errors raised by the store and its repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of string values.
    #[error("store file {path} is corrupt: {source}")]
    CorruptFile {
        path: String,
        source: serde_json::Error,
    },

    /// A stored value does not decode into its expected type.
    #[error("stored value under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    /// A value could not be encoded.
    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    /// A previous writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

/// A string-keyed store of JSON-encoded values.
///
/// Every call reads or rewrites the full value; there are no partial updates
/// and no transactions spanning several keys. Read-modify-write sequences on
/// one key go through [`KeyValueStore::update`].
pub trait KeyValueStore: Send + Sync {
    /// Get the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Replace the value under `key` with the result of `change`, holding
    /// the store lock from the read to the write.
    ///
    /// `change` is called exactly once with the current value. Returning
    /// `None` leaves the stored value untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read or
    /// written. `change` is not called when the read fails.
    fn update(
        &self,
        key: &str,
        change: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> Result<(), StoreError>;
}

/// Read and decode the value under `key`.
pub(crate) fn read_json<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    decode(key, kv.get(key)?)
}

/// Encode and write `value` under `key`.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    kv.set(key, encode(key, value)?)
}

/// Decode the value under `key` (or its default), apply `change` and write
/// the result back, all under the store lock.
///
/// When `change` fails nothing is written and its error is returned.
pub(crate) fn update_json<T, R, E>(
    kv: &dyn KeyValueStore,
    key: &str,
    change: impl FnOnce(&mut T) -> Result<R, E>,
) -> Result<R, E>
where
    T: Serialize + DeserializeOwned + Default,
    E: From<StoreError>,
{
    let mut change = Some(change);
    let mut outcome: Option<Result<R, E>> = None;

    kv.update(key, &mut |raw| {
        let change = change.take()?;
        let mut value: T = match decode(key, raw) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                outcome = Some(Err(e.into()));
                return None;
            }
        };

        match change(&mut value).and_then(|result| {
            encode(key, &value)
                .map(|raw| (result, raw))
                .map_err(E::from)
        }) {
            Ok((result, raw)) => {
                outcome = Some(Ok(result));
                Some(raw)
            }
            Err(e) => {
                outcome = Some(Err(e));
                None
            }
        }
    })?;

    outcome.unwrap_or_else(|| unreachable!("store update did not run its change"))
}

fn decode<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Result<Option<T>, StoreError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    // `JSON.stringify(null)` leaves a literal "null" behind in older stores.
    if raw.trim() == "null" {
        return Ok(None);
    }

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            key: key.to_owned(),
            source,
        })
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_owned(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cornershop_core::ProductId;

    use super::*;

    #[test]
    fn test_comment_key() {
        assert_eq!(keys::comments(ProductId::new(12)), "comments-12");
    }

    #[test]
    fn test_read_missing_and_null() {
        let kv = MemoryStore::new();
        assert!(read_json::<Vec<String>>(&kv, "absent").unwrap().is_none());

        kv.set("nothing", "null".to_string()).unwrap();
        assert!(read_json::<Vec<String>>(&kv, "nothing").unwrap().is_none());
    }

    #[test]
    fn test_read_corrupt_names_the_key() {
        let kv = MemoryStore::new();
        kv.set("cart", "{not json".to_string()).unwrap();

        let err = read_json::<Vec<String>>(&kv, "cart").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "cart"));
    }

    #[test]
    fn test_update_json_writes_on_success_only() {
        let kv = MemoryStore::new();

        let len = update_json(&kv, "list", |list: &mut Vec<String>| {
            list.push("a".to_string());
            Ok::<_, StoreError>(list.len())
        })
        .unwrap();
        assert_eq!(len, 1);

        let err = update_json(&kv, "list", |list: &mut Vec<String>| {
            list.clear();
            Err::<(), _>(StoreError::Poisoned)
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::Poisoned));
        assert_eq!(kv.get("list").unwrap().as_deref(), Some(r#"["a"]"#));
    }

    #[test]
    fn test_update_json_on_corrupt_value_leaves_it() {
        let kv = MemoryStore::new();
        kv.set("list", "{not json".to_string()).unwrap();

        let err = update_json(&kv, "list", |_: &mut Vec<String>| Ok::<_, StoreError>(()))
            .unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert_eq!(kv.get("list").unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let kv = MemoryStore::new();

        std::thread::scope(|scope| {
            for _ in 0..16 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        update_json(&kv, "counter", |n: &mut u32| {
                            *n += 1;
                            Ok::<_, StoreError>(())
                        })
                        .unwrap();
                    }
                });
            }
        });

        assert_eq!(read_json::<u32>(&kv, "counter").unwrap(), Some(400));
    }
}
