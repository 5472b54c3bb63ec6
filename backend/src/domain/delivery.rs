//! Deliveries and their lifecycle.
//!
//! A delivery starts active. It becomes `Delivered` once a courier closes it
//! with an end date and signature, and `Canceled` once a reported problem is
//! resolved by cancellation. Cancellation is one-way: `canceled_at` is never
//! cleared, and cancelling twice keeps the first timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DeliveryId, DeliverymanContact, DeliverymanId, RecipientId};

/// Coarse lifecycle state derived from the timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Neither delivered nor cancelled.
    Active,
    /// Closed by the courier.
    Delivered,
    /// Cancelled after a problem report.
    Canceled,
}

/// A stored delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    /// Primary key.
    pub id: DeliveryId,
    /// Product being shipped.
    pub product: String,
    /// Destination.
    pub recipient_id: RecipientId,
    /// Assigned courier.
    pub deliveryman_id: DeliverymanId,
    /// Reference to the uploaded signature captured on close.
    pub signature_id: Option<i32>,
    /// When the courier picked the parcel up.
    pub start_date: Option<DateTime<Utc>>,
    /// When the parcel was handed over.
    pub end_date: Option<DateTime<Utc>>,
    /// When the delivery was cancelled.
    pub canceled_at: Option<DateTime<Utc>>,
}

impl Delivery {
    /// Current lifecycle state. Cancellation wins over delivery.
    pub fn status(&self) -> DeliveryStatus {
        if self.canceled_at.is_some() {
            DeliveryStatus::Canceled
        } else if self.end_date.is_some() {
            DeliveryStatus::Delivered
        } else {
            DeliveryStatus::Active
        }
    }

    /// Cancellation timestamp to persist when cancelling at `now`.
    ///
    /// Returns the existing timestamp for an already cancelled delivery.
    pub fn cancellation_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.canceled_at.unwrap_or(now)
    }

    /// Whether the delivery is assigned to `deliveryman_id`.
    pub fn is_assigned_to(&self, deliveryman_id: DeliverymanId) -> bool {
        self.deliveryman_id == deliveryman_id
    }
}

/// Values for a delivery that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDelivery {
    pub product: String,
    pub recipient_id: RecipientId,
    pub deliveryman_id: DeliverymanId,
}

/// Partial update applied to a stored delivery.
///
/// Cancellation has its own repository operation so that the
/// never-cleared rule is enforced where the row is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryChanges {
    pub product: Option<String>,
    pub recipient_id: Option<RecipientId>,
    pub deliveryman_id: Option<DeliverymanId>,
    pub signature_id: Option<i32>,
    pub end_date: Option<DateTime<Utc>>,
}

/// A delivery together with its courier's contact details.
///
/// This is the payload of the cancellation mail job and the response body of
/// the problem cancellation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySnapshot {
    /// Delivery row after the change.
    #[serde(flatten)]
    pub delivery: Delivery,
    /// Assigned courier.
    pub deliveryman: DeliverymanContact,
}
