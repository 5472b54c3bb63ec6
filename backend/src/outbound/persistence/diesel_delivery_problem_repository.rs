//! PostgreSQL-backed `DeliveryProblemRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DeliveryProblemRepository, ListFilter, PersistenceError};
use crate::domain::{
    DeliveryId, DeliveryProblem, DeliveryProblemChanges, NewDeliveryProblem, ProblemId,
    ProblemWithDelivery,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    DeliveryProblemRow, DeliveryProblemUpdate, DeliveryRow, NewDeliveryProblemRow,
};
use super::pool::DbPool;
use super::schema::{deliveries, delivery_problems};

/// Diesel-backed implementation of the `DeliveryProblemRepository` port.
#[derive(Clone)]
pub struct DieselDeliveryProblemRepository {
    pool: DbPool,
}

impl DieselDeliveryProblemRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn with_delivery((problem, delivery): (DeliveryProblemRow, DeliveryRow)) -> ProblemWithDelivery {
    ProblemWithDelivery {
        problem: problem.into(),
        delivery: delivery.into(),
    }
}

#[async_trait]
impl DeliveryProblemRepository for DieselDeliveryProblemRepository {
    async fn list(
        &self,
        filter: &ListFilter,
    ) -> Result<Vec<ProblemWithDelivery>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = delivery_problems::table
            .inner_join(deliveries::table)
            .select((DeliveryProblemRow::as_select(), DeliveryRow::as_select()))
            .into_boxed();
        if let Some(pattern) = filter.like_pattern() {
            query = query.filter(delivery_problems::description.ilike(pattern));
        }
        let rows: Vec<(DeliveryProblemRow, DeliveryRow)> = query
            .order(delivery_problems::id.asc())
            .limit(filter.page.limit())
            .offset(filter.page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(with_delivery).collect())
    }

    async fn list_by_delivery(
        &self,
        delivery_id: DeliveryId,
    ) -> Result<Vec<ProblemWithDelivery>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(DeliveryProblemRow, DeliveryRow)> = delivery_problems::table
            .inner_join(deliveries::table)
            .filter(delivery_problems::delivery_id.eq(delivery_id.get()))
            .select((DeliveryProblemRow::as_select(), DeliveryRow::as_select()))
            .order(delivery_problems::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(with_delivery).collect())
    }

    async fn find_by_id(&self, id: ProblemId) -> Result<Option<DeliveryProblem>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DeliveryProblemRow> = delivery_problems::table
            .find(id.get())
            .select(DeliveryProblemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(DeliveryProblem::from))
    }

    async fn find_with_delivery(
        &self,
        id: ProblemId,
    ) -> Result<Option<ProblemWithDelivery>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(DeliveryProblemRow, DeliveryRow)> = delivery_problems::table
            .inner_join(deliveries::table)
            .filter(delivery_problems::id.eq(id.get()))
            .select((DeliveryProblemRow::as_select(), DeliveryRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(with_delivery))
    }

    async fn insert(
        &self,
        problem: &NewDeliveryProblem,
    ) -> Result<DeliveryProblem, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewDeliveryProblemRow {
            delivery_id: problem.delivery_id.get(),
            description: &problem.description,
        };
        let row: DeliveryProblemRow = diesel::insert_into(delivery_problems::table)
            .values(&new_row)
            .returning(DeliveryProblemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: ProblemId,
        changes: &DeliveryProblemChanges,
    ) -> Result<Option<DeliveryProblem>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = DeliveryProblemUpdate {
            delivery_id: changes.delivery_id.map(|id| id.get()),
            description: changes.description.as_deref(),
            updated_at: Utc::now(),
        };
        let row: Option<DeliveryProblemRow> =
            diesel::update(delivery_problems::table.find(id.get()))
                .set(&update)
                .returning(DeliveryProblemRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        Ok(row.map(DeliveryProblem::from))
    }
}
