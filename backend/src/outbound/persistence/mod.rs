//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Constraint violations surface as
//! `PersistenceError::Duplicate` and `PersistenceError::MissingReference` so
//! services can tell them apart from infrastructure failures.
//!
//! # Example
//!
//! ```no_run
//! use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/fastfeet")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_delivery_problem_repository;
mod diesel_delivery_repository;
mod diesel_deliveryman_repository;
mod diesel_error_mapping;
mod diesel_recipient_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_delivery_problem_repository::DieselDeliveryProblemRepository;
pub use diesel_delivery_repository::DieselDeliveryRepository;
pub use diesel_deliveryman_repository::DieselDeliverymanRepository;
pub use diesel_recipient_repository::DieselRecipientRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
