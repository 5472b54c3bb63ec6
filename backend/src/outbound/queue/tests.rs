//! Tests for the in-process mail queue and worker.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MailDeliveryError, Mailer, OutgoingMail};
use crate::domain::{
    CancellationMail, Delivery, DeliveryId, DeliverySnapshot, DeliverymanContact, DeliverymanId,
    Email, RecipientId,
};

/// Mailer failing the first `failures` sends.
struct FlakyMailer {
    failures: u32,
    calls: AtomicU32,
}

impl FlakyMailer {
    fn new(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Mailer for FlakyMailer {
    async fn send(&self, _mail: &OutgoingMail) -> Result<(), MailDeliveryError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            Err(MailDeliveryError::transport("connection reset"))
        } else {
            Ok(())
        }
    }
}

#[fixture]
fn job() -> MailJob {
    MailJob::from(CancellationMail {
        delivery: DeliverySnapshot {
            delivery: Delivery {
                id: DeliveryId::new(1),
                product: "Lamp".into(),
                recipient_id: RecipientId::new(1),
                deliveryman_id: DeliverymanId::new(1),
                signature_id: None,
                start_date: None,
                end_date: None,
                canceled_at: Some(Utc::now()),
            },
            deliveryman: DeliverymanContact {
                id: DeliverymanId::new(1),
                name: "Bruno".into(),
                email: Email::parse("bruno@fastfeet.com").expect("valid email"),
            },
        },
    })
}

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(2),
    }
}

#[rstest]
#[case(1, Duration::from_millis(500))]
#[case(2, Duration::from_millis(1_000))]
#[case(3, Duration::from_millis(2_000))]
#[case(10, Duration::from_secs(30))]
fn backoff_doubles_up_to_the_cap(#[case] attempt: u32, #[case] expected: Duration) {
    assert_eq!(RetryPolicy::default().delay_after(attempt), expected);
}

#[rstest]
#[tokio::test]
async fn add_captures_the_current_trace_id(job: MailJob) {
    let (queue, mut receiver) = ChannelMailQueue::new(4);
    let trace_id = TraceId::generate();
    TraceId::scope(trace_id, queue.add(job.clone()))
        .await
        .expect("job queued");

    let queued = receiver.recv().await.expect("job received");
    assert_eq!(queued.job, job);
    assert_eq!(queued.trace_id, Some(trace_id));
}

#[rstest]
#[tokio::test]
async fn add_rejects_when_full(job: MailJob) {
    let (queue, _receiver) = ChannelMailQueue::new(1);
    queue.add(job.clone()).await.expect("first job fits");
    let err = queue.add(job).await.expect_err("queue full");
    assert!(matches!(err, JobDispatchError::Rejected { .. }));
}

#[rstest]
#[tokio::test]
async fn worker_retries_until_delivered(job: MailJob) {
    let mailer = Arc::new(FlakyMailer::new(2));
    let worker = MailWorker::new(mailer.clone(), fast_policy(3));

    let outcome = worker
        .process(&QueuedJob {
            job,
            trace_id: None,
        })
        .await;
    assert_eq!(
        outcome,
        DeliveryOutcome {
            attempts: 3,
            delivered: true
        }
    );
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 3);
}

#[rstest]
#[tokio::test]
async fn worker_gives_up_after_max_attempts(job: MailJob) {
    let mailer = Arc::new(FlakyMailer::new(u32::MAX));
    let worker = MailWorker::new(mailer.clone(), fast_policy(2));

    let outcome = worker
        .process(&QueuedJob {
            job,
            trace_id: None,
        })
        .await;
    assert!(!outcome.delivered);
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn run_drains_queue_and_stops_when_senders_drop(job: MailJob) {
    let mailer = Arc::new(FlakyMailer::new(0));
    let (queue, receiver) = ChannelMailQueue::new(4);
    queue.add(job.clone()).await.expect("queued");
    queue.add(job).await.expect("queued");
    drop(queue);

    MailWorker::new(mailer.clone(), fast_policy(1))
        .run(receiver)
        .await;
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 2);
}
