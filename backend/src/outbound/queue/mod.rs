//! In-process mail queue.
//!
//! [`ChannelMailQueue`] implements the [`MailQueue`] port over a bounded
//! tokio channel; [`MailWorker`] drains the other end and delivers each job
//! through a [`Mailer`](crate::domain::ports::Mailer), retrying failed sends with capped exponential
//! backoff. Jobs carry the trace identifier of the request that queued them
//! so worker logs correlate with the originating request.

mod worker;

pub use worker::{DeliveryOutcome, MailWorker, RetryPolicy};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::ports::{JobDispatchError, MailQueue};
use crate::domain::{MailJob, TraceId};

/// A job plus the trace identifier active when it was queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedJob {
    /// Job to deliver.
    pub job: MailJob,
    /// Trace identifier of the enqueuing request.
    pub trace_id: Option<TraceId>,
}

/// Receiving half handed to [`MailWorker::run`].
pub type MailJobReceiver = mpsc::Receiver<QueuedJob>;

/// Sending half of the in-process mail queue.
///
/// # Examples
/// ```
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use backend::domain::ports::{JobDispatchError, MailQueue};
/// use backend::outbound::queue::ChannelMailQueue;
///
/// let (queue, receiver) = ChannelMailQueue::new(8);
/// drop(receiver);
/// # let job = backend::domain::MailJob::CancellationMail(
/// #     serde_json::from_value(serde_json::json!({"delivery": {
/// #         "id": 1, "product": "Lamp", "recipient_id": 1, "deliveryman_id": 1,
/// #         "signature_id": null, "start_date": null, "end_date": null,
/// #         "canceled_at": null,
/// #         "deliveryman": {"id": 1, "name": "Bruno", "email": "bruno@fastfeet.com"}
/// #     }})).expect("valid job"),
/// # );
/// let err = queue.add(job).await.expect_err("worker is gone");
/// assert!(matches!(err, JobDispatchError::Unavailable { .. }));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct ChannelMailQueue {
    sender: mpsc::Sender<QueuedJob>,
}

impl ChannelMailQueue {
    /// Create a queue holding at most `capacity` pending jobs.
    ///
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> (Self, MailJobReceiver) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl MailQueue for ChannelMailQueue {
    async fn add(&self, job: MailJob) -> Result<(), JobDispatchError> {
        let key = job.key();
        let queued = QueuedJob {
            job,
            trace_id: TraceId::current(),
        };
        self.sender.try_send(queued).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => {
                JobDispatchError::rejected(format!("{key} queue is full"))
            }
            mpsc::error::TrySendError::Closed(_) => {
                JobDispatchError::unavailable("mail worker has stopped")
            }
        })?;
        debug!(job = key, "mail job queued");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
