//! Embedded PostgreSQL databases for the Diesel adapter suites.
//!
//! Each test gets its own temporary database on the process-wide cluster,
//! migrated with the same embedded migrations the server applies at start-up.
//! Cluster bootstrap must not run inside a Tokio runtime, so the harness owns
//! a runtime and tests drive async calls through [`MigratedDatabase::block_on`].

use std::future::Future;

use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// A freshly migrated database plus a pool connected to it.
pub struct MigratedDatabase {
    runtime: Runtime,
    pool: DbPool,
    _database: TemporaryDatabase,
}

impl MigratedDatabase {
    /// Pool connected to this database.
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Run `future` to completion on the harness runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Provision a temporary database and apply every migration.
pub fn migrated_database() -> Result<MigratedDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|err| format!("cluster: {err:?}"))?;
    let database = cluster
        .temporary_database(format!("test_{}", Uuid::new_v4().simple()))
        .map_err(|err| format!("create database: {err:?}"))?;
    let runtime = Runtime::new().map_err(|err| err.to_string())?;

    let url = database.url().to_string();
    let pool = runtime.block_on(async {
        run_pending_migrations(&url)
            .await
            .map_err(|err| err.to_string())?;
        DbPool::new(PoolConfig::new(url.as_str()).with_max_size(2))
            .await
            .map_err(|err| err.to_string())
    })?;

    Ok(MigratedDatabase {
        runtime,
        pool,
        _database: database,
    })
}
