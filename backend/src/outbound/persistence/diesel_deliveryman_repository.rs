//! PostgreSQL-backed `DeliverymanRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DeliverymanRepository, ListFilter, PersistenceError};
use crate::domain::{Deliveryman, DeliverymanChanges, DeliverymanId, NewDeliveryman};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DeliverymanRow, DeliverymanUpdate, NewDeliverymanRow};
use super::pool::DbPool;
use super::schema::deliverymen;

/// Diesel-backed implementation of the `DeliverymanRepository` port.
///
/// Deleting a deliveryman cascades to their deliveries at the database.
#[derive(Clone)]
pub struct DieselDeliverymanRepository {
    pool: DbPool,
}

impl DieselDeliverymanRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeliverymanRepository for DieselDeliverymanRepository {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Deliveryman>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = deliverymen::table
            .select(DeliverymanRow::as_select())
            .into_boxed();
        if let Some(pattern) = filter.like_pattern() {
            query = query.filter(deliverymen::name.ilike(pattern));
        }
        let rows: Vec<DeliverymanRow> = query
            .order(deliverymen::id.asc())
            .limit(filter.page.limit())
            .offset(filter.page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(DeliverymanRow::into_domain).collect()
    }

    async fn find_by_id(
        &self,
        id: DeliverymanId,
    ) -> Result<Option<Deliveryman>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DeliverymanRow> = deliverymen::table
            .find(id.get())
            .select(DeliverymanRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(DeliverymanRow::into_domain).transpose()
    }

    async fn insert(&self, deliveryman: &NewDeliveryman) -> Result<Deliveryman, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewDeliverymanRow {
            name: &deliveryman.name,
            email: deliveryman.email.as_ref(),
            avatar_id: deliveryman.avatar_id,
        };
        let row: DeliverymanRow = diesel::insert_into(deliverymen::table)
            .values(&new_row)
            .returning(DeliverymanRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain()
    }

    async fn update(
        &self,
        id: DeliverymanId,
        changes: &DeliverymanChanges,
    ) -> Result<Option<Deliveryman>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = DeliverymanUpdate {
            name: changes.name.as_deref(),
            email: changes.email.as_ref().map(AsRef::as_ref),
            avatar_id: changes.avatar_id,
            updated_at: Utc::now(),
        };
        let row: Option<DeliverymanRow> = diesel::update(deliverymen::table.find(id.get()))
            .set(&update)
            .returning(DeliverymanRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(DeliverymanRow::into_domain).transpose()
    }

    async fn delete(&self, id: DeliverymanId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(deliverymen::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
