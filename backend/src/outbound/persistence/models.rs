//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! reach the domain. Read rows convert into domain entities with the
//! `into_domain` methods; stored e-mail addresses are re-validated on the way
//! out.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::ports::PersistenceError;
use crate::domain::{
    Delivery, DeliveryId, DeliveryProblem, Deliveryman, DeliverymanContact, DeliverymanId, Email,
    PasswordHash, ProblemId, Recipient, RecipientId, User, UserId,
};

use super::schema::{deliveries, delivery_problems, deliverymen, recipients, users};

fn stored_email(raw: String) -> Result<Email, PersistenceError> {
    Email::parse(raw).map_err(|err| PersistenceError::query(format!("stored email: {err}")))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub admin: bool,
}

impl UserRow {
    pub fn into_domain(self) -> Result<User, PersistenceError> {
        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            email: stored_email(self.email)?,
            password_hash: PasswordHash::new(self.password_hash),
            admin: self.admin,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub admin: bool,
}

/// `None` fields are left untouched; `updated_at` keeps the changeset non-empty.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Deliverymen
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deliverymen)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeliverymanRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub avatar_id: Option<i32>,
}

impl DeliverymanRow {
    pub fn into_domain(self) -> Result<Deliveryman, PersistenceError> {
        Ok(Deliveryman {
            id: DeliverymanId::new(self.id),
            name: self.name,
            email: stored_email(self.email)?,
            avatar_id: self.avatar_id,
        })
    }
}

/// Contact columns joined into delivery snapshots.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deliverymen)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeliverymanContactRow {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl DeliverymanContactRow {
    pub fn into_domain(self) -> Result<DeliverymanContact, PersistenceError> {
        Ok(DeliverymanContact {
            id: DeliverymanId::new(self.id),
            name: self.name,
            email: stored_email(self.email)?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deliverymen)]
pub(crate) struct NewDeliverymanRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub avatar_id: Option<i32>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = deliverymen)]
pub(crate) struct DeliverymanUpdate<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub avatar_id: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Recipients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipientRow {
    pub id: i32,
    pub name: String,
    pub street: String,
    pub number: i32,
    pub complement: Option<String>,
    pub state: String,
    pub city: String,
    pub cep: String,
}

impl From<RecipientRow> for Recipient {
    fn from(row: RecipientRow) -> Self {
        Self {
            id: RecipientId::new(row.id),
            name: row.name,
            street: row.street,
            number: row.number,
            complement: row.complement,
            state: row.state,
            city: row.city,
            cep: row.cep,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipients)]
pub(crate) struct NewRecipientRow<'a> {
    pub name: &'a str,
    pub street: &'a str,
    pub number: i32,
    pub complement: Option<&'a str>,
    pub state: &'a str,
    pub city: &'a str,
    pub cep: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipients)]
pub(crate) struct RecipientUpdate<'a> {
    pub name: Option<&'a str>,
    pub street: Option<&'a str>,
    pub number: Option<i32>,
    pub complement: Option<&'a str>,
    pub state: Option<&'a str>,
    pub city: Option<&'a str>,
    pub cep: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Deliveries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeliveryRow {
    pub id: i32,
    pub product: String,
    pub recipient_id: i32,
    pub deliveryman_id: i32,
    pub signature_id: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

impl From<DeliveryRow> for Delivery {
    fn from(row: DeliveryRow) -> Self {
        Self {
            id: DeliveryId::new(row.id),
            product: row.product,
            recipient_id: RecipientId::new(row.recipient_id),
            deliveryman_id: DeliverymanId::new(row.deliveryman_id),
            signature_id: row.signature_id,
            start_date: row.start_date,
            end_date: row.end_date,
            canceled_at: row.canceled_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deliveries)]
pub(crate) struct NewDeliveryRow<'a> {
    pub product: &'a str,
    pub recipient_id: i32,
    pub deliveryman_id: i32,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = deliveries)]
pub(crate) struct DeliveryUpdate<'a> {
    pub product: Option<&'a str>,
    pub recipient_id: Option<i32>,
    pub deliveryman_id: Option<i32>,
    pub signature_id: Option<i32>,
    pub end_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Delivery problems
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = delivery_problems)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeliveryProblemRow {
    pub id: i32,
    pub delivery_id: i32,
    pub description: String,
}

impl From<DeliveryProblemRow> for DeliveryProblem {
    fn from(row: DeliveryProblemRow) -> Self {
        Self {
            id: ProblemId::new(row.id),
            delivery_id: DeliveryId::new(row.delivery_id),
            description: row.description,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = delivery_problems)]
pub(crate) struct NewDeliveryProblemRow<'a> {
    pub delivery_id: i32,
    pub description: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = delivery_problems)]
pub(crate) struct DeliveryProblemUpdate<'a> {
    pub delivery_id: Option<i32>,
    pub description: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn user_row_converts_to_domain() {
        let row = UserRow {
            id: 7,
            name: "Ada".into(),
            email: "ada@fastfeet.com".into(),
            password_hash: "$2b$04$hash".into(),
            admin: true,
        };
        let user = row.into_domain().expect("valid row");
        assert_eq!(user.id, UserId::new(7));
        assert_eq!(user.email.as_ref(), "ada@fastfeet.com");
        assert_eq!(user.password_hash.as_str(), "$2b$04$hash");
    }

    #[rstest]
    fn malformed_stored_email_is_a_query_error() {
        let row = DeliverymanRow {
            id: 1,
            name: "Bruno".into(),
            email: "not-an-email".into(),
            avatar_id: None,
        };
        let err = row.into_domain().expect_err("malformed email");
        assert!(matches!(err, PersistenceError::Query { .. }));
    }
}
