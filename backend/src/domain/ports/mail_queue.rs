//! Port describing how mail jobs are handed to the background worker.
use async_trait::async_trait;

use crate::domain::MailJob;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the queue adapter.
    pub enum JobDispatchError {
        /// Queue infrastructure is unavailable.
        Unavailable { message: String } => "mail queue is unavailable: {message}",
        /// The job could not be accepted.
        Rejected { message: String } => "mail job was rejected: {message}",
    }
}

/// Fire-and-forget job queue. `add` returns once the job is accepted; the
/// queue owns delivery, retries and backoff.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailQueue: Send + Sync {
    /// Enqueue `job`.
    async fn add(&self, job: MailJob) -> Result<(), JobDispatchError>;
}
