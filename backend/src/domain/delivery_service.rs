//! Delivery management use cases, including closing a delivery.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pagination::{ListQuery, PageSize};
use tracing::info;

use crate::domain::ports::{
    DeliveryRepository, DeliverymanRepository, PersistenceError, RecipientRepository,
};
use crate::domain::service_support::{list_filter, map_persistence_error, page_size};
use crate::domain::{
    Delivery, DeliveryChanges, DeliveryId, DeliveryStatus, DeliverymanId, Error, NewDelivery,
    RecipientId,
};

const STORE: &str = "delivery";

/// Proof of hand-over submitted by the courier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseDeliveryRequest {
    /// When the parcel was delivered.
    pub end_date: DateTime<Utc>,
    /// Reference to the uploaded signature.
    pub signature_id: i32,
}

/// Delivery CRUD plus the courier-facing close operation.
#[derive(Clone)]
pub struct DeliveryService {
    deliveries: Arc<dyn DeliveryRepository>,
    recipients: Arc<dyn RecipientRepository>,
    deliverymen: Arc<dyn DeliverymanRepository>,
}

impl DeliveryService {
    /// Rows per list page.
    pub const PAGE_SIZE: PageSize = page_size(10);

    /// Create a service over the given repositories.
    pub fn new(
        deliveries: Arc<dyn DeliveryRepository>,
        recipients: Arc<dyn RecipientRepository>,
        deliverymen: Arc<dyn DeliverymanRepository>,
    ) -> Self {
        Self {
            deliveries,
            recipients,
            deliverymen,
        }
    }

    fn not_found() -> Error {
        Error::not_found("delivery not found")
    }

    fn map_write_error(err: PersistenceError) -> Error {
        match err {
            PersistenceError::MissingReference { .. } => {
                Error::not_found("referenced recipient or deliveryman not found")
            }
            other => map_persistence_error(STORE)(other),
        }
    }

    async fn ensure_recipient(&self, id: RecipientId) -> Result<(), Error> {
        self.recipients
            .find_by_id(id)
            .await
            .map_err(map_persistence_error("recipient"))?
            .map(|_| ())
            .ok_or_else(|| Error::not_found("recipient not found"))
    }

    async fn ensure_deliveryman(&self, id: DeliverymanId) -> Result<(), Error> {
        self.deliverymen
            .find_by_id(id)
            .await
            .map_err(map_persistence_error("deliveryman"))?
            .map(|_| ())
            .ok_or_else(|| Error::not_found("deliveryman not found"))
    }

    /// Page of deliveries whose product contains the query text.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Delivery>, Error> {
        self.deliveries
            .list(&list_filter(query, Self::PAGE_SIZE))
            .await
            .map_err(map_persistence_error(STORE))
    }

    pub async fn show(&self, id: DeliveryId) -> Result<Delivery, Error> {
        self.deliveries
            .find_by_id(id)
            .await
            .map_err(map_persistence_error(STORE))?
            .ok_or_else(Self::not_found)
    }

    /// Register a delivery after checking both references exist.
    pub async fn create(&self, delivery: NewDelivery) -> Result<Delivery, Error> {
        self.ensure_recipient(delivery.recipient_id).await?;
        self.ensure_deliveryman(delivery.deliveryman_id).await?;
        let created = self
            .deliveries
            .insert(&delivery)
            .await
            .map_err(Self::map_write_error)?;
        info!(delivery_id = %created.id, "delivery created");
        Ok(created)
    }

    pub async fn update(&self, id: DeliveryId, changes: DeliveryChanges) -> Result<Delivery, Error> {
        let current = self.show(id).await?;
        if let Some(recipient_id) = changes.recipient_id.filter(|rid| *rid != current.recipient_id)
        {
            self.ensure_recipient(recipient_id).await?;
        }
        if let Some(deliveryman_id) = changes
            .deliveryman_id
            .filter(|did| *did != current.deliveryman_id)
        {
            self.ensure_deliveryman(deliveryman_id).await?;
        }
        self.deliveries
            .update(id, &changes)
            .await
            .map_err(Self::map_write_error)?
            .ok_or_else(Self::not_found)
    }

    pub async fn delete(&self, id: DeliveryId) -> Result<(), Error> {
        let deleted = self
            .deliveries
            .delete(id)
            .await
            .map_err(map_persistence_error(STORE))?;
        if !deleted {
            return Err(Self::not_found());
        }
        info!(delivery_id = %id, "delivery deleted");
        Ok(())
    }

    /// Record the hand-over of a delivery by its courier.
    ///
    /// # Errors
    ///
    /// - not found when the courier or delivery is missing, or the delivery
    ///   is assigned to somebody else;
    /// - invalid request when the delivery was cancelled.
    pub async fn close(
        &self,
        deliveryman_id: DeliverymanId,
        delivery_id: DeliveryId,
        request: CloseDeliveryRequest,
    ) -> Result<Delivery, Error> {
        self.ensure_deliveryman(deliveryman_id).await?;
        let delivery = self.show(delivery_id).await?;
        if !delivery.is_assigned_to(deliveryman_id) {
            return Err(Self::not_found());
        }
        let previous = delivery.status();
        if previous == DeliveryStatus::Canceled {
            return Err(Error::invalid_request("delivery canceled"));
        }

        let changes = DeliveryChanges {
            end_date: Some(request.end_date),
            signature_id: Some(request.signature_id),
            ..DeliveryChanges::default()
        };
        let closed = self
            .deliveries
            .update(delivery_id, &changes)
            .await
            .map_err(map_persistence_error(STORE))?
            .ok_or_else(Self::not_found)?;
        info!(
            delivery_id = %delivery_id,
            deliveryman_id = %deliveryman_id,
            ?previous,
            "delivery closed"
        );
        Ok(closed)
    }
}

#[cfg(test)]
#[path = "delivery_service_tests.rs"]
mod tests;
