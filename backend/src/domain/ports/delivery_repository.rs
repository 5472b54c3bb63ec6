//! Port abstraction for delivery persistence adapters.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Delivery, DeliveryChanges, DeliveryId, DeliverySnapshot, NewDelivery};

use super::{ListFilter, PersistenceError};

/// Storage for deliveries. List filters match on product.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Delivery>, PersistenceError>;

    async fn find_by_id(&self, id: DeliveryId) -> Result<Option<Delivery>, PersistenceError>;

    /// Fetch a delivery joined with its courier's contact projection.
    async fn find_snapshot(
        &self,
        id: DeliveryId,
    ) -> Result<Option<DeliverySnapshot>, PersistenceError>;

    async fn insert(&self, delivery: &NewDelivery) -> Result<Delivery, PersistenceError>;

    async fn update(
        &self,
        id: DeliveryId,
        changes: &DeliveryChanges,
    ) -> Result<Option<Delivery>, PersistenceError>;

    /// Set `canceled_at` to `at` unless the delivery is already cancelled.
    ///
    /// Returns `false` only when the delivery does not exist; an already
    /// cancelled row is left untouched and still reported as found.
    async fn cancel(&self, id: DeliveryId, at: DateTime<Utc>) -> Result<bool, PersistenceError>;

    async fn delete(&self, id: DeliveryId) -> Result<bool, PersistenceError>;
}
