//! Recipient management use cases.

use std::sync::Arc;

use pagination::{ListQuery, PageSize};
use tracing::info;

use crate::domain::ports::RecipientRepository;
use crate::domain::service_support::{list_filter, map_persistence_error, page_size};
use crate::domain::{Error, NewRecipient, Recipient, RecipientChanges, RecipientId};

const STORE: &str = "recipient";

/// CRUD over [`RecipientRepository`].
#[derive(Clone)]
pub struct RecipientService {
    recipients: Arc<dyn RecipientRepository>,
}

impl RecipientService {
    /// Rows per list page.
    pub const PAGE_SIZE: PageSize = page_size(10);

    pub fn new(recipients: Arc<dyn RecipientRepository>) -> Self {
        Self { recipients }
    }

    fn not_found() -> Error {
        Error::not_found("recipient not found")
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Recipient>, Error> {
        self.recipients
            .list(&list_filter(query, Self::PAGE_SIZE))
            .await
            .map_err(map_persistence_error(STORE))
    }

    pub async fn show(&self, id: RecipientId) -> Result<Recipient, Error> {
        self.recipients
            .find_by_id(id)
            .await
            .map_err(map_persistence_error(STORE))?
            .ok_or_else(Self::not_found)
    }

    pub async fn create(&self, recipient: NewRecipient) -> Result<Recipient, Error> {
        let created = self
            .recipients
            .insert(&recipient)
            .await
            .map_err(map_persistence_error(STORE))?;
        info!(recipient_id = %created.id, "recipient created");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: RecipientId,
        changes: RecipientChanges,
    ) -> Result<Recipient, Error> {
        self.recipients
            .update(id, &changes)
            .await
            .map_err(map_persistence_error(STORE))?
            .ok_or_else(Self::not_found)
    }

    pub async fn delete(&self, id: RecipientId) -> Result<(), Error> {
        let deleted = self
            .recipients
            .delete(id)
            .await
            .map_err(map_persistence_error(STORE))?;
        if !deleted {
            return Err(Self::not_found());
        }
        info!(recipient_id = %id, "recipient deleted");
        Ok(())
    }
}
