//! Port abstraction for delivery problem persistence adapters.
use async_trait::async_trait;

use crate::domain::{
    DeliveryId, DeliveryProblem, DeliveryProblemChanges, NewDeliveryProblem, ProblemId,
    ProblemWithDelivery,
};

use super::{ListFilter, PersistenceError};

/// Storage for problem reports. List filters match on description.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryProblemRepository: Send + Sync {
    /// Reports joined with their delivery, ordered by id.
    async fn list(&self, filter: &ListFilter)
    -> Result<Vec<ProblemWithDelivery>, PersistenceError>;

    /// Every report filed against `delivery_id`, ordered by id.
    async fn list_by_delivery(
        &self,
        delivery_id: DeliveryId,
    ) -> Result<Vec<ProblemWithDelivery>, PersistenceError>;

    async fn find_by_id(&self, id: ProblemId) -> Result<Option<DeliveryProblem>, PersistenceError>;

    async fn find_with_delivery(
        &self,
        id: ProblemId,
    ) -> Result<Option<ProblemWithDelivery>, PersistenceError>;

    async fn insert(&self, problem: &NewDeliveryProblem)
    -> Result<DeliveryProblem, PersistenceError>;

    async fn update(
        &self,
        id: ProblemId,
        changes: &DeliveryProblemChanges,
    ) -> Result<Option<DeliveryProblem>, PersistenceError>;
}
