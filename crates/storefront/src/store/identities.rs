//! Identity repository: the `users` list and the `user` session record.

use cornershop_core::Email;

use super::{KeyValueStore, StoreError, keys, read_json, update_json, write_json};
use crate::models::Identity;

/// Typed access to registered identities and the current user.
pub struct IdentityStore<'a> {
    kv: &'a dyn KeyValueStore,
}

impl<'a> IdentityStore<'a> {
    /// Create a repository over `kv`.
    #[must_use]
    pub const fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self { kv }
    }

    /// All registered identities, in registration order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the stored list does not decode.
    pub fn list(&self) -> Result<Vec<Identity>, StoreError> {
        Ok(read_json(self.kv, keys::USERS)?.unwrap_or_default())
    }

    /// Apply `change` to the identity list under the store lock.
    ///
    /// Nothing is written when `change` fails.
    ///
    /// # Errors
    ///
    /// Returns the error of `change`, or a `StoreError` converted into `E`.
    pub fn update_all<R, E>(
        &self,
        change: impl FnOnce(&mut Vec<Identity>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        update_json(self.kv, keys::USERS, change)
    }

    /// First identity registered under `email`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the stored list does not decode.
    pub fn find_by_email(&self, email: &Email) -> Result<Option<Identity>, StoreError> {
        Ok(self.list()?.into_iter().find(|i| &i.email == email))
    }

    /// The logged-in identity, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the stored record does not decode.
    pub fn current(&self) -> Result<Option<Identity>, StoreError> {
        read_json(self.kv, keys::CURRENT_USER)
    }

    /// Store `identity` as the logged-in user, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be written.
    pub fn set_current(&self, identity: &Identity) -> Result<(), StoreError> {
        write_json(self.kv, keys::CURRENT_USER, identity)
    }

    /// Forget the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be written.
    pub fn clear_current(&self) -> Result<(), StoreError> {
        self.kv.remove(keys::CURRENT_USER)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn identity(email: &str) -> Identity {
        Identity {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_string(),
        }
    }

    #[test]
    fn test_list_defaults_to_empty() {
        let kv = MemoryStore::new();
        assert!(IdentityStore::new(&kv).list().unwrap().is_empty());
    }

    #[test]
    fn test_find_by_email() {
        let kv = MemoryStore::new();
        let store = IdentityStore::new(&kv);
        store
            .update_all(|ids| {
                ids.extend([identity("a@example.com"), identity("b@example.com")]);
                Ok::<_, StoreError>(())
            })
            .unwrap();

        let found = store
            .find_by_email(&Email::parse("b@example.com").unwrap())
            .unwrap();
        assert_eq!(found.unwrap().email.as_str(), "b@example.com");
        assert!(
            store
                .find_by_email(&Email::parse("c@example.com").unwrap())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_update_all_appends_and_keeps_on_error() {
        let kv = MemoryStore::new();
        let store = IdentityStore::new(&kv);

        let err = store
            .update_all(|ids| {
                ids.push(identity("a@example.com"));
                Err::<(), _>(StoreError::Poisoned)
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Poisoned));
        assert!(store.list().unwrap().is_empty());

        let count = store
            .update_all(|ids| {
                ids.push(identity("b@example.com"));
                Ok::<_, StoreError>(ids.len())
            })
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(store.list().unwrap(), [identity("b@example.com")]);
    }

    #[test]
    fn test_current_user_lifecycle() {
        let kv = MemoryStore::new();
        let store = IdentityStore::new(&kv);
        assert!(store.current().unwrap().is_none());

        store.set_current(&identity("a@example.com")).unwrap();
        assert_eq!(store.current().unwrap(), Some(identity("a@example.com")));

        store.clear_current().unwrap();
        assert!(store.current().unwrap().is_none());
    }

    #[test]
    fn test_invalid_stored_email_is_corrupt() {
        let kv = MemoryStore::new();
        kv.set(
            keys::USERS,
            r#"[{"firstName":"A","lastName":"B","email":"nope","passwordHash":"h"}]"#.to_string(),
        )
        .unwrap();

        let err = IdentityStore::new(&kv).list().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
