//! Problems reported by couriers against a delivery.

use crate::domain::{Delivery, DeliveryId, ProblemId};

/// A stored problem report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryProblem {
    /// Primary key.
    pub id: ProblemId,
    /// Delivery the report refers to.
    pub delivery_id: DeliveryId,
    /// Free-text description.
    pub description: String,
}

/// A problem report joined with its delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemWithDelivery {
    /// The report.
    pub problem: DeliveryProblem,
    /// Delivery referenced by `problem.delivery_id`.
    pub delivery: Delivery,
}

/// Values for a report that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeliveryProblem {
    pub delivery_id: DeliveryId,
    pub description: String,
}

/// Partial update applied to a stored report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryProblemChanges {
    pub delivery_id: Option<DeliveryId>,
    pub description: Option<String>,
}
