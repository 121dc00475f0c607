//! Authentication service.
//!
//! Password registration and login against the identities kept in the local
//! store. The "session" is the stored current-user record; there is no token
//! and no expiry.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use cornershop_core::Email;

use crate::models::{Identity, SessionState};
use crate::store::{CartStore, IdentityStore, KeyValueStore};

/// Registration form input.
#[derive(Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// Authentication service.
///
/// Handles registration, login, logout and session lookup.
pub struct AuthService<'a> {
    identities: IdentityStore<'a>,
    carts: CartStore<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self {
            identities: IdentityStore::new(kv),
            carts: CartStore::new(kv),
        }
    }

    /// Register a new identity.
    ///
    /// Does not log the new identity in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if a field is blank.
    /// Returns `AuthError::PasswordMismatch` if the confirmation differs.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    #[instrument(skip_all, fields(email = %form.email.trim()))]
    pub fn register(&self, form: &Registration) -> Result<Identity, AuthError> {
        let first_name = required(&form.first_name, "first name")?;
        let last_name = required(&form.last_name, "last name")?;
        let email = required(&form.email, "email")?;
        let password = form.password.expose_secret();
        if password.trim().is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        if password != form.confirm_password.expose_secret() {
            return Err(AuthError::PasswordMismatch);
        }

        let email = Email::parse(email)?;

        let identity = Identity {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email,
            password_hash: hash_password(password)?,
        };

        self.identities.update_all(|identities| {
            if identities.iter().any(|i| i.email == identity.email) {
                return Err(AuthError::EmailTaken);
            }
            identities.push(identity.clone());
            Ok(())
        })?;

        info!("Registered new identity");
        Ok(identity)
    }

    /// Login with email and password.
    ///
    /// On success the identity becomes the stored current user, replacing
    /// any previous one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong.
    #[instrument(skip(self, password), fields(email = %email.trim()))]
    pub fn login(&self, email: &str, password: &SecretString) -> Result<Identity, AuthError> {
        let email = Email::parse(email.trim()).map_err(|_| AuthError::InvalidCredentials)?;

        let identity = self
            .identities
            .find_by_email(&email)?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.expose_secret(), &identity.password_hash)?;

        self.identities.set_current(&identity)?;

        info!("Login succeeded");
        Ok(identity)
    }

    /// Forget the current user and their cart.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the store cannot be written.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        self.identities.clear_current()?;
        self.carts.clear()?;
        Ok(())
    }

    /// The stored current user, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the stored record is corrupt.
    pub fn current_user(&self) -> Result<Option<Identity>, AuthError> {
        Ok(self.identities.current()?)
    }

    /// Whether anyone is logged in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the stored record is corrupt.
    pub fn session(&self) -> Result<SessionState, AuthError> {
        Ok(SessionState::from_current(self.current_user()?))
    }
}

fn required<'s>(value: &'s str, field: &'static str) -> Result<&'s str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(trimmed)
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cornershop_core::ProductId;

    use super::*;
    use crate::store::{MemoryStore, StoreError, keys};

    fn form(email: &str, password: &str, confirm: &str) -> Registration {
        Registration {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: SecretString::from(password),
            confirm_password: SecretString::from(confirm),
        }
    }

    #[test]
    fn test_register_hashes_password() {
        let kv = MemoryStore::new();
        let auth = AuthService::new(&kv);

        let identity = auth
            .register(&form(" ada@example.com ", "hunter22", "hunter22"))
            .unwrap();

        assert_eq!(identity.email.as_str(), "ada@example.com");
        assert!(identity.password_hash.starts_with("$argon2id$"));
        assert!(!kv.get(keys::USERS).unwrap().unwrap().contains("hunter22"));
    }

    #[test]
    fn test_register_duplicate_email_leaves_list_unchanged() {
        let kv = MemoryStore::new();
        let auth = AuthService::new(&kv);
        auth.register(&form("ada@example.com", "pw", "pw")).unwrap();
        let before = kv.get(keys::USERS).unwrap();

        let err = auth
            .register(&form("ada@example.com", "other", "other"))
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(kv.get(keys::USERS).unwrap(), before);
    }

    #[test]
    fn test_concurrent_registrations_keep_emails_unique() {
        let kv = MemoryStore::new();
        let barrier = std::sync::Barrier::new(4);
        let emails = [
            "ada@example.com",
            "ada@example.com",
            "ada@example.com",
            "grace@example.com",
        ];

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = emails
                .iter()
                .map(|email| {
                    let (kv, barrier) = (&kv, &barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        AuthService::new(kv).register(&form(email, "pw", "pw"))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let ada_ok = results
            .iter()
            .take(3)
            .filter(|r| r.is_ok())
            .count();
        let ada_taken = results
            .iter()
            .take(3)
            .filter(|r| matches!(r, Err(AuthError::EmailTaken)))
            .count();
        assert_eq!((ada_ok, ada_taken), (1, 2));
        assert!(results.last().unwrap().is_ok());

        let stored = IdentityStore::new(&kv).list().unwrap();
        let mut stored_emails: Vec<_> = stored.iter().map(|i| i.email.as_str()).collect();
        stored_emails.sort_unstable();
        assert_eq!(stored_emails, ["ada@example.com", "grace@example.com"]);
    }

    #[test]
    fn test_register_validation() {
        let kv = MemoryStore::new();
        let auth = AuthService::new(&kv);

        assert!(matches!(
            auth.register(&form("ada@example.com", "a", "b")),
            Err(AuthError::PasswordMismatch)
        ));
        assert!(matches!(
            auth.register(&form("   ", "a", "a")),
            Err(AuthError::MissingField("email"))
        ));
        assert!(matches!(
            auth.register(&form("not-an-email", "a", "a")),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(kv.get(keys::USERS).unwrap().is_none());
    }

    #[test]
    fn test_login_sets_current_user() {
        let kv = MemoryStore::new();
        let auth = AuthService::new(&kv);
        let registered = auth.register(&form("ada@example.com", "pw", "pw")).unwrap();
        assert!(!auth.session().unwrap().is_authenticated());

        let identity = auth
            .login("ada@example.com", &SecretString::from("pw"))
            .unwrap();

        assert_eq!(identity, registered);
        assert_eq!(auth.current_user().unwrap(), Some(registered));
        assert!(auth.session().unwrap().is_authenticated());
    }

    #[test]
    fn test_login_failures_keep_anonymous() {
        let kv = MemoryStore::new();
        let auth = AuthService::new(&kv);
        auth.register(&form("ada@example.com", "pw", "pw")).unwrap();

        let wrong_password = auth
            .login("ada@example.com", &SecretString::from("nope"))
            .unwrap_err();
        let unknown = auth
            .login("bob@example.com", &SecretString::from("pw"))
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), "Invalid email or password");
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(!auth.session().unwrap().is_authenticated());
    }

    #[test]
    fn test_logout_clears_user_and_cart() {
        let kv = MemoryStore::new();
        let auth = AuthService::new(&kv);
        auth.register(&form("ada@example.com", "pw", "pw")).unwrap();
        auth.login("ada@example.com", &SecretString::from("pw"))
            .unwrap();
        CartStore::new(&kv)
            .update(|cart| Ok::<_, StoreError>(cart.add(ProductId::new(1))))
            .unwrap();

        auth.logout().unwrap();

        assert!(kv.get(keys::CURRENT_USER).unwrap().is_none());
        assert!(kv.get(keys::CART).unwrap().is_none());
        assert!(kv.get(keys::USERS).unwrap().is_some());
    }
}
