//! Couriers assigned to deliveries.

use serde::{Deserialize, Serialize};

use crate::domain::{DeliverymanId, Email};

/// A stored courier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deliveryman {
    /// Primary key.
    pub id: DeliverymanId,
    /// Display name.
    pub name: String,
    /// Contact address used for notifications.
    pub email: Email,
    /// Reference to an uploaded avatar file.
    pub avatar_id: Option<i32>,
}

impl Deliveryman {
    /// Contact projection attached to delivery snapshots.
    pub fn contact(&self) -> DeliverymanContact {
        DeliverymanContact {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Values for a courier that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeliveryman {
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: Email,
    /// Optional avatar reference.
    pub avatar_id: Option<i32>,
}

/// Partial update applied to a stored courier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliverymanChanges {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement contact address.
    pub email: Option<Email>,
    /// Replacement avatar reference.
    pub avatar_id: Option<i32>,
}

/// The subset of a courier exposed alongside a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverymanContact {
    /// Courier key.
    pub id: DeliverymanId,
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: Email,
}
