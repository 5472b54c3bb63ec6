//! Test helpers for inbound HTTP components.
//!
//! Handlers are exercised against the in-memory store, a channel-backed mail
//! queue whose receiver the test keeps, a low-cost bcrypt hasher and a frozen
//! clock.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::{
    DeliveryProblemRepository, DeliveryRepository, DeliverymanRepository, RecipientRepository,
};
use crate::domain::{
    Delivery, DeliveryId, DeliveryProblem, Deliveryman, DeliverymanId, Email, NewDelivery,
    NewDeliveryProblem, NewDeliveryman, NewRecipient, Recipient, RecipientId,
};
use crate::inbound::http::error::{json_config, path_config, query_config};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::MemoryStore;
use crate::outbound::queue::{ChannelMailQueue, MailJobReceiver};
use crate::outbound::security::BcryptPasswordHasher;
pub use crate::test_support::{FixedClock, frozen_now};

/// Handles shared by a test and the app under test.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub jobs: MailJobReceiver,
    pub state: web::Data<HttpState>,
}

impl TestContext {
    /// Fresh store, queue and services.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let (queue, jobs) = ChannelMailQueue::new(16);
        let state = HttpState::new(HttpStatePorts {
            users: store.clone(),
            deliverymen: store.clone(),
            recipients: store.clone(),
            deliveries: store.clone(),
            problems: store.clone(),
            hasher: Arc::new(BcryptPasswordHasher::new(4)),
            mail_queue: Arc::new(queue),
            clock: Arc::new(FixedClock(frozen_now())),
        });
        Self {
            store,
            jobs,
            state: web::Data::new(state),
        }
    }

    /// App wired like the server: extractor configs, trace ids and the API scope.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .wrap(Trace)
            .service(crate::inbound::http::api_scope())
    }

    pub async fn deliveryman(&self, name: &str, email: &str) -> Deliveryman {
        DeliverymanRepository::insert(
            self.store.as_ref(),
            &NewDeliveryman {
                name: name.into(),
                email: Email::parse(email).expect("valid email"),
                avatar_id: None,
            },
        )
        .await
        .expect("deliveryman stored")
    }

    pub async fn recipient(&self, name: &str) -> Recipient {
        RecipientRepository::insert(
            self.store.as_ref(),
            &NewRecipient {
                name: name.into(),
                street: "Rua Um".into(),
                number: 10,
                complement: None,
                state: "SP".into(),
                city: "Campinas".into(),
                cep: "13000-000".into(),
            },
        )
        .await
        .expect("recipient stored")
    }

    pub async fn delivery(
        &self,
        product: &str,
        recipient_id: RecipientId,
        deliveryman_id: DeliverymanId,
    ) -> Delivery {
        DeliveryRepository::insert(
            self.store.as_ref(),
            &NewDelivery {
                product: product.into(),
                recipient_id,
                deliveryman_id,
            },
        )
        .await
        .expect("delivery stored")
    }

    pub async fn problem(&self, delivery_id: DeliveryId, description: &str) -> DeliveryProblem {
        DeliveryProblemRepository::insert(
            self.store.as_ref(),
            &NewDeliveryProblem {
                delivery_id,
                description: description.into(),
            },
        )
        .await
        .expect("problem stored")
    }
}
