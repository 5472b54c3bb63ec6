//! End-to-end flow over the public API: register the parties, create a
//! delivery, report a problem, cancel the delivery and hand the queued
//! notification to the mail worker.

use std::sync::{Arc, Mutex};

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::{App, web};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

use backend::Trace;
use backend::domain::ports::{MailDeliveryError, Mailer, OutgoingMail};
use backend::inbound::http::api_scope;
use backend::inbound::http::error::{json_config, path_config, query_config};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::MemoryStore;
use backend::outbound::queue::{ChannelMailQueue, MailWorker, RetryPolicy};
use backend::outbound::security::BcryptPasswordHasher;

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailDeliveryError> {
        self.sent
            .lock()
            .map_err(|_| MailDeliveryError::transport("poisoned"))?
            .push(mail.clone());
        Ok(())
    }
}

#[rstest]
#[actix_web::test]
async fn reporting_and_cancelling_notifies_the_courier() {
    let store = Arc::new(MemoryStore::default());
    let (queue, mut receiver) = ChannelMailQueue::new(8);
    let state = web::Data::new(HttpState::new(HttpStatePorts {
        users: store.clone(),
        deliverymen: store.clone(),
        recipients: store.clone(),
        deliveries: store.clone(),
        problems: store,
        hasher: Arc::new(BcryptPasswordHasher::new(4)),
        mail_queue: Arc::new(queue),
        clock: Arc::new(DefaultClock),
    }));
    let app = actix_test::init_service(
        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .wrap(Trace)
            .service(api_scope()),
    )
    .await;

    let post = |uri: &str, body: Value| {
        actix_test::TestRequest::post()
            .uri(uri)
            .set_json(body)
            .to_request()
    };

    let courier: Value = actix_test::call_and_read_body_json(
        &app,
        post(
            "/api/v1/deliverymen",
            json!({"name": "Bruno", "email": "bruno@fastfeet.com"}),
        ),
    )
    .await;
    let recipient: Value = actix_test::call_and_read_body_json(
        &app,
        post(
            "/api/v1/recipients",
            json!({
                "name": "Carla",
                "street": "Rua Um",
                "number": 10,
                "state": "SP",
                "city": "Campinas",
                "cep": "13000-000"
            }),
        ),
    )
    .await;
    let delivery: Value = actix_test::call_and_read_body_json(
        &app,
        post(
            "/api/v1/deliveries",
            json!({
                "product": "Desk lamp",
                "recipient_id": recipient["id"],
                "deliveryman_id": courier["id"]
            }),
        ),
    )
    .await;
    let problem: Value = actix_test::call_and_read_body_json(
        &app,
        post(
            &format!("/api/v1/deliverymen/{}/problems", courier["id"]),
            json!({"delivery_id": delivery["id"], "description": "Box crushed"}),
        ),
    )
    .await;

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/problems/{}", problem["id"]))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("trace-id"));
    let canceled: Value = actix_test::read_body_json(response).await;
    assert!(canceled["canceled_at"].is_string());
    assert_eq!(canceled["deliveryman"]["email"], "bruno@fastfeet.com");

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/problems/{}", problem["id"]))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let queued = receiver.try_recv().expect("cancellation mail queued");
    assert!(queued.trace_id.is_some());
    assert!(receiver.try_recv().is_err(), "exactly one job is queued");

    let mailer = Arc::new(RecordingMailer::default());
    let outcome = MailWorker::new(mailer.clone(), RetryPolicy::default())
        .process(&queued)
        .await;
    assert!(outcome.delivered);
    assert_eq!(outcome.attempts, 1);

    let sent = mailer.sent.lock().expect("mailer lock");
    assert_eq!(sent.len(), 1);
    let mail = sent.first().expect("one mail");
    assert_eq!(mail.to.as_ref(), "bruno@fastfeet.com");
    assert_eq!(mail.subject, "Delivery canceled");
    assert!(mail.body.contains("Desk lamp"));
}
