//! PostgreSQL-backed `RecipientRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ListFilter, PersistenceError, RecipientRepository};
use crate::domain::{NewRecipient, Recipient, RecipientChanges, RecipientId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewRecipientRow, RecipientRow, RecipientUpdate};
use super::pool::DbPool;
use super::schema::recipients;

/// Diesel-backed implementation of the `RecipientRepository` port.
#[derive(Clone)]
pub struct DieselRecipientRepository {
    pool: DbPool,
}

impl DieselRecipientRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientRepository for DieselRecipientRepository {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Recipient>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = recipients::table
            .select(RecipientRow::as_select())
            .into_boxed();
        if let Some(pattern) = filter.like_pattern() {
            query = query.filter(recipients::name.ilike(pattern));
        }
        let rows: Vec<RecipientRow> = query
            .order(recipients::id.asc())
            .limit(filter.page.limit())
            .offset(filter.page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Recipient::from).collect())
    }

    async fn find_by_id(&self, id: RecipientId) -> Result<Option<Recipient>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipientRow> = recipients::table
            .find(id.get())
            .select(RecipientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Recipient::from))
    }

    async fn insert(&self, recipient: &NewRecipient) -> Result<Recipient, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewRecipientRow {
            name: &recipient.name,
            street: &recipient.street,
            number: recipient.number,
            complement: recipient.complement.as_deref(),
            state: &recipient.state,
            city: &recipient.city,
            cep: &recipient.cep,
        };
        let row: RecipientRow = diesel::insert_into(recipients::table)
            .values(&new_row)
            .returning(RecipientRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: RecipientId,
        changes: &RecipientChanges,
    ) -> Result<Option<Recipient>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = RecipientUpdate {
            name: changes.name.as_deref(),
            street: changes.street.as_deref(),
            number: changes.number,
            complement: changes.complement.as_deref(),
            state: changes.state.as_deref(),
            city: changes.city.as_deref(),
            cep: changes.cep.as_deref(),
            updated_at: Utc::now(),
        };
        let row: Option<RecipientRow> = diesel::update(recipients::table.find(id.get()))
            .set(&update)
            .returning(RecipientRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Recipient::from))
    }

    async fn delete(&self, id: RecipientId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(recipients::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
