//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services, which in turn only depend on ports. Swapping the
//! Diesel adapters for the in-memory store needs no handler changes.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    DeliveryProblemRepository, DeliveryRepository, DeliverymanRepository, MailQueue,
    PasswordHasher, RecipientRepository, UserRepository,
};
use crate::domain::{
    DeliveryProblemService, DeliveryService, DeliverymanService, RecipientService, UserService,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub deliverymen: Arc<dyn DeliverymanRepository>,
    pub recipients: Arc<dyn RecipientRepository>,
    pub deliveries: Arc<dyn DeliveryRepository>,
    pub problems: Arc<dyn DeliveryProblemRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub mail_queue: Arc<dyn MailQueue>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<UserService>,
    pub deliverymen: Arc<DeliverymanService>,
    pub recipients: Arc<RecipientService>,
    pub deliveries: Arc<DeliveryService>,
    pub problems: Arc<DeliveryProblemService>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Build every service from one ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use backend::outbound::memory::MemoryStore;
    /// use backend::outbound::queue::ChannelMailQueue;
    /// use backend::outbound::security::BcryptPasswordHasher;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(MemoryStore::default());
    /// let (queue, _jobs) = ChannelMailQueue::new(8);
    /// let state = HttpState::new(HttpStatePorts {
    ///     users: store.clone(),
    ///     deliverymen: store.clone(),
    ///     recipients: store.clone(),
    ///     deliveries: store.clone(),
    ///     problems: store,
    ///     hasher: Arc::new(BcryptPasswordHasher::default()),
    ///     mail_queue: Arc::new(queue),
    ///     clock: Arc::new(DefaultClock),
    /// });
    /// let _users = state.users.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            deliverymen,
            recipients,
            deliveries,
            problems,
            hasher,
            mail_queue,
            clock,
        } = ports;
        Self {
            users: Arc::new(UserService::new(users, hasher)),
            deliverymen: Arc::new(DeliverymanService::new(deliverymen.clone())),
            recipients: Arc::new(RecipientService::new(recipients.clone())),
            deliveries: Arc::new(DeliveryService::new(
                deliveries.clone(),
                recipients,
                deliverymen.clone(),
            )),
            problems: Arc::new(DeliveryProblemService::new(
                problems,
                deliveries,
                deliverymen,
                mail_queue,
                clock,
            )),
        }
    }
}
