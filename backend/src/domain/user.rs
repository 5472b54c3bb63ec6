//! Administrator accounts.

use std::fmt;

use crate::domain::{Email, UserId};

/// A bcrypt hash of a user's password.
///
/// The hash never leaves the domain in a projection; `Debug` redacts it so it
/// does not leak into logs either.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already computed hash.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Encoded hash string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Primary key.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique login address.
    pub email: Email,
    /// Hash of the current password.
    pub password_hash: PasswordHash,
    /// Whether the account has administrative rights.
    pub admin: bool,
}

/// Values for a user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Unique login address.
    pub email: Email,
    /// Hash of the initial password.
    pub password_hash: PasswordHash,
    /// Whether the account has administrative rights.
    pub admin: bool,
}

/// Partial update applied to a stored user; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement login address.
    pub email: Option<Email>,
    /// Replacement password hash.
    pub password_hash: Option<PasswordHash>,
}

impl UserChanges {
    /// True when applying the changes would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$2b$04$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
        assert_eq!(hash.as_str(), "$2b$04$secret");
    }

    #[test]
    fn default_changes_are_empty() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            name: Some("Ada".into()),
            ..UserChanges::default()
        };
        assert!(!changes.is_empty());
    }
}
