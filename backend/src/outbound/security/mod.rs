//! Password hashing adapter backed by `bcrypt`.
//!
//! Bcrypt is CPU bound, so both hashing and verification run on the blocking
//! pool rather than on the async workers.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Bcrypt implementation of the [`PasswordHasher`] port.
///
/// # Examples
/// ```
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use backend::domain::ports::PasswordHasher;
/// use backend::outbound::security::BcryptPasswordHasher;
///
/// let hasher = BcryptPasswordHasher::new(4);
/// let hash = hasher.hash("123456").await.expect("hash");
/// assert!(hasher.verify("123456", &hash).await.expect("verify"));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Cost used when none is configured.
    pub const DEFAULT_COST: u32 = 8;

    /// Create a hasher with the given bcrypt cost, clamped to bcrypt's range.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(4, 31),
        }
    }

    /// Configured cost factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|err| PasswordHashError::hashing(format!("task join error: {err}")))?
            .map(PasswordHash::new)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let password = password.to_owned();
        let hash = hash.as_str().to_owned();
        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|err| PasswordHashError::hashing(format!("task join error: {err}")))?
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        debug!(matched, "password verified");
        Ok(matched)
    }
}
