//! PostgreSQL-backed `DeliveryRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DeliveryRepository, ListFilter, PersistenceError};
use crate::domain::{Delivery, DeliveryChanges, DeliveryId, DeliverySnapshot, NewDelivery};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DeliveryRow, DeliveryUpdate, DeliverymanContactRow, NewDeliveryRow};
use super::pool::DbPool;
use super::schema::{deliveries, deliverymen};

/// Diesel-backed implementation of the `DeliveryRepository` port.
///
/// Cancellation is a conditional update on `canceled_at IS NULL`, so a second
/// cancel leaves the first timestamp in place.
#[derive(Clone)]
pub struct DieselDeliveryRepository {
    pool: DbPool,
}

impl DieselDeliveryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeliveryRepository for DieselDeliveryRepository {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Delivery>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = deliveries::table
            .select(DeliveryRow::as_select())
            .into_boxed();
        if let Some(pattern) = filter.like_pattern() {
            query = query.filter(deliveries::product.ilike(pattern));
        }
        let rows: Vec<DeliveryRow> = query
            .order(deliveries::id.asc())
            .limit(filter.page.limit())
            .offset(filter.page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Delivery::from).collect())
    }

    async fn find_by_id(&self, id: DeliveryId) -> Result<Option<Delivery>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DeliveryRow> = deliveries::table
            .find(id.get())
            .select(DeliveryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Delivery::from))
    }

    async fn find_snapshot(
        &self,
        id: DeliveryId,
    ) -> Result<Option<DeliverySnapshot>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(DeliveryRow, DeliverymanContactRow)> = deliveries::table
            .inner_join(deliverymen::table)
            .filter(deliveries::id.eq(id.get()))
            .select((DeliveryRow::as_select(), DeliverymanContactRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|(delivery, deliveryman)| {
            Ok(DeliverySnapshot {
                delivery: delivery.into(),
                deliveryman: deliveryman.into_domain()?,
            })
        })
        .transpose()
    }

    async fn insert(&self, delivery: &NewDelivery) -> Result<Delivery, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewDeliveryRow {
            product: &delivery.product,
            recipient_id: delivery.recipient_id.get(),
            deliveryman_id: delivery.deliveryman_id.get(),
        };
        let row: DeliveryRow = diesel::insert_into(deliveries::table)
            .values(&new_row)
            .returning(DeliveryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: DeliveryId,
        changes: &DeliveryChanges,
    ) -> Result<Option<Delivery>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = DeliveryUpdate {
            product: changes.product.as_deref(),
            recipient_id: changes.recipient_id.map(|id| id.get()),
            deliveryman_id: changes.deliveryman_id.map(|id| id.get()),
            signature_id: changes.signature_id,
            end_date: changes.end_date,
            updated_at: Utc::now(),
        };
        let row: Option<DeliveryRow> = diesel::update(deliveries::table.find(id.get()))
            .set(&update)
            .returning(DeliveryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Delivery::from))
    }

    async fn cancel(&self, id: DeliveryId, at: DateTime<Utc>) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            deliveries::table
                .find(id.get())
                .filter(deliveries::canceled_at.is_null()),
        )
        .set((
            deliveries::canceled_at.eq(Some(at)),
            deliveries::updated_at.eq(at),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if updated > 0 {
            return Ok(true);
        }

        // Nothing updated: either missing or already cancelled.
        diesel::select(diesel::dsl::exists(deliveries::table.find(id.get())))
            .get_result::<bool>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: DeliveryId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(deliveries::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
