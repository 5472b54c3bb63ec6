//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `FASTFEET_*` environment variables and an
//! optional configuration file. Scalars carry defaults and the remaining
//! fields are optional, so the binary starts with an empty environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;
use crate::outbound::queue::RetryPolicy;
use crate::outbound::security::BcryptPasswordHasher;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_QUEUE_CAPACITY: usize = 256;
const DEFAULT_MAIL_ATTEMPTS: u32 = 3;
const DEFAULT_MAIL_BACKOFF_MS: u64 = 500;

/// Runtime settings for the FastFeet server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FASTFEET")]
pub struct AppSettings {
    /// Interface the HTTP listener binds to.
    pub host: Option<IpAddr>,
    /// Port the HTTP listener binds to.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL connection string. Without it data lives in memory.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
    /// Seconds a request waits for a free database connection.
    #[ortho_config(default = 30)]
    pub pool_timeout_secs: u64,
    /// Capacity of the mail job channel.
    #[ortho_config(default = 256)]
    pub queue_capacity: usize,
    /// Delivery attempts per mail job.
    #[ortho_config(default = 3)]
    pub mail_max_attempts: u32,
    /// Delay before the first mail retry, in milliseconds.
    #[ortho_config(default = 500)]
    pub mail_backoff_ms: u64,
    /// Sender address for outgoing mail.
    pub mail_from: Option<String>,
    /// Work factor for bcrypt password hashes.
    #[ortho_config(default = 8)]
    pub bcrypt_cost: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            database_url: None,
            pool_max_size: DEFAULT_POOL_SIZE,
            pool_timeout_secs: DEFAULT_POOL_TIMEOUT_SECS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            mail_max_attempts: DEFAULT_MAIL_ATTEMPTS,
            mail_backoff_ms: DEFAULT_MAIL_BACKOFF_MS,
            mail_from: None,
            bcrypt_cost: BcryptPasswordHasher::DEFAULT_COST,
        }
    }
}

impl AppSettings {
    /// Socket address for the HTTP listener; `0.0.0.0:8080` by default.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port,
        )
    }

    /// Database URL with blank values treated as absent.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool sizing for `url`.
    pub fn pool_config(&self, url: &str) -> PoolConfig {
        PoolConfig::new(url)
            .with_max_size(self.pool_max_size)
            .with_checkout_timeout(Duration::from_secs(self.pool_timeout_secs))
    }

    /// Mail channel capacity, at least one.
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }

    /// Retry policy for the mail worker.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.mail_max_attempts.max(1),
            initial_backoff: Duration::from_millis(self.mail_backoff_ms),
            ..RetryPolicy::default()
        }
    }

    pub fn mail_from(&self) -> Option<&str> {
        self.mail_from.as_deref()
    }
}
