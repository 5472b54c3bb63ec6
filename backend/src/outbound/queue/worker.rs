//! Background delivery of queued mail jobs.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::domain::TraceId;
use crate::domain::ports::Mailer;

use super::{MailJobReceiver, QueuedJob};

/// Retry behaviour for failed sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum send attempts per job, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound on any single delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay after the `attempt`-th failure: `initial * 2^(attempt - 1)`,
    /// capped at `max_backoff`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = 2_u32.saturating_pow(attempt.saturating_sub(1));
        let base_ms = u64::try_from(self.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(u64::from(exponent)).min(max_ms))
    }
}

/// Result of processing one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// Number of send attempts made.
    pub attempts: u32,
    /// Whether the mail was eventually sent.
    pub delivered: bool,
}

/// Consumer of the in-process mail queue.
pub struct MailWorker {
    mailer: Arc<dyn Mailer>,
    policy: RetryPolicy,
}

impl MailWorker {
    /// Create a worker sending through `mailer`.
    pub fn new(mailer: Arc<dyn Mailer>, policy: RetryPolicy) -> Self {
        Self { mailer, policy }
    }

    /// Process jobs until every queue handle has been dropped.
    pub async fn run(self, mut receiver: MailJobReceiver) {
        info!("mail worker started");
        while let Some(queued) = receiver.recv().await {
            let trace_id = queued.trace_id.unwrap_or_else(TraceId::generate);
            TraceId::scope(trace_id, self.process(&queued)).await;
        }
        info!("mail worker stopped");
    }

    /// Deliver one job, retrying failed sends according to the policy.
    pub async fn process(&self, queued: &QueuedJob) -> DeliveryOutcome {
        let key = queued.job.key();
        let trace_id = queued.trace_id.map(|id| id.to_string()).unwrap_or_default();
        let mail = queued.job.render();
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.mailer.send(&mail).await {
                Ok(()) => {
                    info!(job = key, %trace_id, attempt, "mail job delivered");
                    return DeliveryOutcome {
                        attempts: attempt,
                        delivered: true,
                    };
                }
                Err(err) if attempt < max_attempts => {
                    let delay = self.policy.delay_after(attempt);
                    warn!(
                        job = key,
                        %trace_id,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "mail delivery failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    error!(
                        job = key,
                        %trace_id,
                        attempt,
                        error = %err,
                        "mail delivery failed; giving up"
                    );
                }
            }
        }

        DeliveryOutcome {
            attempts: max_attempts,
            delivered: false,
        }
    }
}
