//! Port abstraction for recipient persistence adapters.
use async_trait::async_trait;

use crate::domain::{NewRecipient, Recipient, RecipientChanges, RecipientId};

use super::{ListFilter, PersistenceError};

/// Storage for recipients. List filters match on name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipientRepository: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Recipient>, PersistenceError>;

    async fn find_by_id(&self, id: RecipientId) -> Result<Option<Recipient>, PersistenceError>;

    async fn insert(&self, recipient: &NewRecipient) -> Result<Recipient, PersistenceError>;

    async fn update(
        &self,
        id: RecipientId,
        changes: &RecipientChanges,
    ) -> Result<Option<Recipient>, PersistenceError>;

    async fn delete(&self, id: RecipientId) -> Result<bool, PersistenceError>;
}
