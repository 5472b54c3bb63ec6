//! Port abstraction for courier persistence adapters.
use async_trait::async_trait;

use crate::domain::{Deliveryman, DeliverymanChanges, DeliverymanId, NewDeliveryman};

use super::{ListFilter, PersistenceError};

/// Storage for couriers. List filters match on name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliverymanRepository: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Deliveryman>, PersistenceError>;

    async fn find_by_id(&self, id: DeliverymanId)
    -> Result<Option<Deliveryman>, PersistenceError>;

    async fn insert(&self, deliveryman: &NewDeliveryman) -> Result<Deliveryman, PersistenceError>;

    async fn update(
        &self,
        id: DeliverymanId,
        changes: &DeliverymanChanges,
    ) -> Result<Option<Deliveryman>, PersistenceError>;

    async fn delete(&self, id: DeliverymanId) -> Result<bool, PersistenceError>;
}
