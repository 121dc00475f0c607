//! Registered identities and the session state derived from them.

use serde::{Deserialize, Serialize};

use cornershop_core::Email;

/// A registered account.
///
/// The same record is stored twice: once in the `users` list and once as the
/// `user` value while logged in. Passwords are kept only as Argon2id PHC
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login key. Unique across the `users` list.
    pub email: Email,
    /// Argon2id hash of the password.
    pub password_hash: String,
}

impl Identity {
    /// Name shown in the navigation bar.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.first_name
    }
}

/// Whether anyone is logged in on this device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No current user is stored.
    Anonymous,
    /// The stored current user.
    Authenticated(Identity),
}

impl SessionState {
    /// Derive the state from the stored current user.
    #[must_use]
    pub fn from_current(current: Option<Identity>) -> Self {
        current.map_or(Self::Anonymous, Self::Authenticated)
    }

    /// The logged-in identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }

    /// True when a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ada() -> Identity {
        Identity {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(ada()).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["passwordHash"], "$argon2id$stub");
    }

    #[test]
    fn test_plaintext_record_does_not_decode() {
        let legacy = r#"{"firstName":"A","lastName":"B","email":"a@b.c","password":"hunter2"}"#;
        assert!(serde_json::from_str::<Identity>(legacy).is_err());
    }

    #[test]
    fn test_session_state() {
        assert!(!SessionState::from_current(None).is_authenticated());
        let state = SessionState::from_current(Some(ada()));
        assert_eq!(state.identity().unwrap().display_name(), "Ada");
    }
}
