//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: mutex-guarded in-process repositories, used when no database
//!   is configured and by the HTTP tests
//! - **queue**: in-process mail job queue and its background worker
//! - **mail**: mail transport writing structured log events
//! - **security**: bcrypt password hashing
//!
//! Adapters translate between domain types and infrastructure representations.
//! They contain no business logic.

pub mod mail;
pub mod memory;
pub mod persistence;
pub mod queue;
pub mod security;
