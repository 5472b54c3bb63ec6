//! Port abstraction for user persistence adapters.
use async_trait::async_trait;

use crate::domain::{Email, NewUser, User, UserChanges, UserId};

use super::PersistenceError;

/// Storage for administrator accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every user ordered by id.
    async fn list(&self) -> Result<Vec<User>, PersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError>;

    /// Fetch the user owning `email`.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, PersistenceError>;

    /// Persist a new user and return the stored row.
    async fn insert(&self, user: &NewUser) -> Result<User, PersistenceError>;

    /// Apply `changes`; `None` when the user does not exist.
    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, PersistenceError>;

    /// Remove a user; `false` when nothing was deleted.
    async fn delete(&self, id: UserId) -> Result<bool, PersistenceError>;
}
