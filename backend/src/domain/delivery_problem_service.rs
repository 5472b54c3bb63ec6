//! Delivery problem reports and the cancellation they trigger.
//!
//! Resolving a problem does not remove the report. It cancels the delivery,
//! reloads it with the courier's contact details and queues a
//! `CancellationMail` job carrying that snapshot. The handler returns as soon
//! as the job is accepted; sending is the queue's business.

use std::sync::Arc;

use mockable::Clock;
use pagination::{ListQuery, PageSize};
use tracing::{error, info};

use crate::domain::ports::{
    DeliveryProblemRepository, DeliveryRepository, DeliverymanRepository, JobDispatchError,
    MailQueue, PersistenceError,
};
use crate::domain::service_support::{list_filter, map_persistence_error, page_size};
use crate::domain::{
    CancellationMail, DeliveryId, DeliveryProblem, DeliveryProblemChanges, DeliverySnapshot,
    DeliverymanId, Error, MailJob, NewDeliveryProblem, ProblemId, ProblemWithDelivery,
};

const STORE: &str = "delivery problem";

/// Problem reporting and resolution.
#[derive(Clone)]
pub struct DeliveryProblemService {
    problems: Arc<dyn DeliveryProblemRepository>,
    deliveries: Arc<dyn DeliveryRepository>,
    deliverymen: Arc<dyn DeliverymanRepository>,
    queue: Arc<dyn MailQueue>,
    clock: Arc<dyn Clock>,
}

impl DeliveryProblemService {
    /// Rows per list page.
    pub const PAGE_SIZE: PageSize = page_size(4);

    /// Create a service over the given ports.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use backend::domain::DeliveryProblemService;
    /// # use backend::outbound::memory::MemoryStore;
    /// # use backend::outbound::queue::ChannelMailQueue;
    /// # use mockable::DefaultClock;
    /// let store = Arc::new(MemoryStore::default());
    /// let (queue, _jobs) = ChannelMailQueue::new(8);
    /// let service = DeliveryProblemService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(queue),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        problems: Arc<dyn DeliveryProblemRepository>,
        deliveries: Arc<dyn DeliveryRepository>,
        deliverymen: Arc<dyn DeliverymanRepository>,
        queue: Arc<dyn MailQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            problems,
            deliveries,
            deliverymen,
            queue,
            clock,
        }
    }

    fn problem_not_found() -> Error {
        Error::not_found("problem not found")
    }

    fn delivery_not_found() -> Error {
        Error::not_found("delivery not found")
    }

    fn map_write_error(err: PersistenceError) -> Error {
        match err {
            PersistenceError::MissingReference { .. } => Self::delivery_not_found(),
            other => map_persistence_error(STORE)(other),
        }
    }

    fn map_dispatch_error(err: JobDispatchError) -> Error {
        error!(error = %err, "failed to enqueue cancellation mail");
        Error::internal(format!("failed to enqueue cancellation mail: {err}"))
    }

    async fn ensure_delivery(&self, id: DeliveryId) -> Result<(), Error> {
        self.deliveries
            .find_by_id(id)
            .await
            .map_err(map_persistence_error("delivery"))?
            .map(|_| ())
            .ok_or_else(Self::delivery_not_found)
    }

    /// Page of reports whose description contains the query text.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<ProblemWithDelivery>, Error> {
        self.problems
            .list(&list_filter(query, Self::PAGE_SIZE))
            .await
            .map_err(map_persistence_error(STORE))
    }

    /// Every report filed against a delivery.
    pub async fn list_for_delivery(
        &self,
        delivery_id: DeliveryId,
    ) -> Result<Vec<ProblemWithDelivery>, Error> {
        self.ensure_delivery(delivery_id).await?;
        self.problems
            .list_by_delivery(delivery_id)
            .await
            .map_err(map_persistence_error(STORE))
    }

    pub async fn show(&self, id: ProblemId) -> Result<ProblemWithDelivery, Error> {
        self.problems
            .find_with_delivery(id)
            .await
            .map_err(map_persistence_error(STORE))?
            .ok_or_else(Self::problem_not_found)
    }

    /// File a report on behalf of a courier.
    ///
    /// The delivery is checked before the courier; nothing is written when
    /// either is missing.
    pub async fn create(
        &self,
        deliveryman_id: DeliverymanId,
        problem: NewDeliveryProblem,
    ) -> Result<DeliveryProblem, Error> {
        self.ensure_delivery(problem.delivery_id).await?;
        self.deliverymen
            .find_by_id(deliveryman_id)
            .await
            .map_err(map_persistence_error("deliveryman"))?
            .ok_or_else(|| Error::not_found("deliveryman not found"))?;

        let created = self
            .problems
            .insert(&problem)
            .await
            .map_err(Self::map_write_error)?;
        info!(
            problem_id = %created.id,
            delivery_id = %created.delivery_id,
            deliveryman_id = %deliveryman_id,
            "delivery problem reported"
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        id: ProblemId,
        changes: DeliveryProblemChanges,
    ) -> Result<ProblemWithDelivery, Error> {
        let current = self
            .problems
            .find_by_id(id)
            .await
            .map_err(map_persistence_error(STORE))?
            .ok_or_else(Self::problem_not_found)?;
        if let Some(delivery_id) = changes
            .delivery_id
            .filter(|did| *did != current.delivery_id)
        {
            self.ensure_delivery(delivery_id).await?;
        }

        self.problems
            .update(id, &changes)
            .await
            .map_err(Self::map_write_error)?
            .ok_or_else(Self::problem_not_found)?;
        self.show(id).await
    }

    /// Resolve a report by cancelling its delivery.
    ///
    /// An already cancelled delivery keeps its original `canceled_at`; the
    /// mail is queued again either way. Enqueue failures surface as internal
    /// errors after the cancellation has been persisted.
    pub async fn cancel_delivery(&self, id: ProblemId) -> Result<DeliverySnapshot, Error> {
        let problem = self
            .problems
            .find_by_id(id)
            .await
            .map_err(map_persistence_error(STORE))?
            .ok_or_else(Self::problem_not_found)?;

        let found = self
            .deliveries
            .cancel(problem.delivery_id, self.clock.utc())
            .await
            .map_err(map_persistence_error("delivery"))?;
        if !found {
            return Err(Self::delivery_not_found());
        }

        let snapshot = self
            .deliveries
            .find_snapshot(problem.delivery_id)
            .await
            .map_err(map_persistence_error("delivery"))?
            .ok_or_else(Self::delivery_not_found)?;

        self.queue
            .add(MailJob::from(CancellationMail {
                delivery: snapshot.clone(),
            }))
            .await
            .map_err(Self::map_dispatch_error)?;
        info!(
            problem_id = %id,
            delivery_id = %snapshot.delivery.id,
            "delivery cancelled"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "delivery_problem_service_tests.rs"]
mod tests;
