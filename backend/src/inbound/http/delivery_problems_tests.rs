//! Handler coverage for problem reports and delivery cancellation.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::json;
use tokio::sync::mpsc::error::TryRecvError;

use super::*;
use crate::domain::MailJob;
use crate::domain::ports::{DeliveryProblemRepository, DeliveryRepository};
use crate::inbound::http::test_utils::{TestContext, frozen_now};

#[rstest]
#[actix_web::test]
async fn cancel_marks_the_delivery_and_queues_one_mail() {
    let mut ctx = TestContext::new();
    let recipient = ctx.recipient("Carla").await;
    let courier = ctx.deliveryman("Bruno", "bruno@fastfeet.com").await;
    let delivery = ctx.delivery("Lamp", recipient.id, courier.id).await;
    let problem = ctx.problem(delivery.id, "Box crushed").await;
    let app = actix_test::init_service(ctx.app()).await;

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/problems/{}", problem.id))
        .to_request();
    let body: CanceledDeliveryResponse = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.delivery.id, delivery.id.get());
    assert_eq!(body.delivery.canceled_at, Some(frozen_now()));
    assert_eq!(body.deliveryman.email, "bruno@fastfeet.com");

    let queued = ctx.jobs.try_recv().expect("one job queued");
    let MailJob::CancellationMail(mail) = queued.job;
    assert_eq!(mail.delivery.delivery.id, delivery.id);
    assert_eq!(mail.delivery.deliveryman.name, "Bruno");
    assert!(matches!(ctx.jobs.try_recv(), Err(TryRecvError::Empty)));

    let kept = DeliveryProblemRepository::find_by_id(ctx.store.as_ref(), problem.id)
        .await
        .expect("lookup");
    assert_eq!(kept, Some(problem));
}

#[rstest]
#[actix_web::test]
async fn cancelling_twice_keeps_the_first_timestamp() {
    let ctx = TestContext::new();
    let recipient = ctx.recipient("Carla").await;
    let courier = ctx.deliveryman("Bruno", "bruno@fastfeet.com").await;
    let delivery = ctx.delivery("Lamp", recipient.id, courier.id).await;
    let problem = ctx.problem(delivery.id, "Box crushed").await;
    let app = actix_test::init_service(ctx.app()).await;

    for _ in 0..2 {
        let request = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/problems/{}", problem.id))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let stored = DeliveryRepository::find_by_id(ctx.store.as_ref(), delivery.id)
        .await
        .expect("lookup")
        .expect("delivery kept");
    assert_eq!(stored.canceled_at, Some(frozen_now()));
}

#[rstest]
#[actix_web::test]
async fn cancel_of_unknown_problem_is_not_found() {
    let mut ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/problems/41")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = actix_test::read_body_json(response).await;
    assert_eq!(body.error, "problem not found");
    assert!(matches!(ctx.jobs.try_recv(), Err(TryRecvError::Empty)));
}

#[rstest]
#[actix_web::test]
async fn create_returns_the_filed_problem() {
    let ctx = TestContext::new();
    let recipient = ctx.recipient("Carla").await;
    let courier = ctx.deliveryman("Bruno", "bruno@fastfeet.com").await;
    let delivery = ctx.delivery("Lamp", recipient.id, courier.id).await;
    let app = actix_test::init_service(ctx.app()).await;

    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/deliverymen/{}/problems", courier.id))
        .set_json(json!({"delivery_id": delivery.id.get(), "description": "Nobody home"}))
        .to_request();
    let created: CreatedProblemResponse = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(created.description, "Nobody home");
    assert_eq!(created.delivery_id, delivery.id.get());
}

#[rstest]
#[actix_web::test]
async fn create_for_missing_delivery_writes_nothing() {
    let ctx = TestContext::new();
    let courier = ctx.deliveryman("Bruno", "bruno@fastfeet.com").await;
    let app = actix_test::init_service(ctx.app()).await;

    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/deliverymen/{}/problems", courier.id))
        .set_json(json!({"delivery_id": 77, "description": "Nobody home"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = actix_test::read_body_json(response).await;
    assert_eq!(body.error, "delivery not found");

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/problems")
        .to_request();
    let listed: Vec<ProblemListItem> = actix_test::call_and_read_body_json(&app, request).await;
    assert!(listed.is_empty());
}

#[rstest]
#[case(json!({"delivery_id": 1}))]
#[case(json!({"description": "Nobody home", "delivery_id": "first"}))]
#[actix_web::test]
async fn create_rejects_invalid_payloads(#[case] body: serde_json::Value) {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/deliverymen/1/problems")
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn list_pages_by_four_and_filters_description() {
    let ctx = TestContext::new();
    let recipient = ctx.recipient("Carla").await;
    let courier = ctx.deliveryman("Bruno", "bruno@fastfeet.com").await;
    let delivery = ctx.delivery("Lamp", recipient.id, courier.id).await;
    for n in 1..=6 {
        ctx.problem(delivery.id, &format!("Broken seal {n}")).await;
    }
    ctx.problem(delivery.id, "Wrong address").await;
    let app = actix_test::init_service(ctx.app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/problems?problemQuery=broken&page=2")
        .to_request();
    let listed: Vec<ProblemListItem> = actix_test::call_and_read_body_json(&app, request).await;

    let descriptions: Vec<_> = listed.iter().map(|p| p.description.as_str()).collect();
    assert_eq!(descriptions, ["Broken seal 5", "Broken seal 6"]);
    assert_eq!(listed[0].delivery.product, "Lamp");
    assert_eq!(listed[0].delivery.canceled_at, None);
}

#[rstest]
#[actix_web::test]
async fn delivery_problems_lists_only_that_delivery() {
    let ctx = TestContext::new();
    let recipient = ctx.recipient("Carla").await;
    let courier = ctx.deliveryman("Bruno", "bruno@fastfeet.com").await;
    let lamp = ctx.delivery("Lamp", recipient.id, courier.id).await;
    let chair = ctx.delivery("Chair", recipient.id, courier.id).await;
    ctx.problem(lamp.id, "Box crushed").await;
    ctx.problem(chair.id, "Leg missing").await;
    let app = actix_test::init_service(ctx.app()).await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/deliveries/{}/problems", chair.id))
        .to_request();
    let listed: Vec<ProblemResponse> = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].description, "Leg missing");
    assert_eq!(listed[0].delivery.product, "Chair");
}

#[rstest]
#[actix_web::test]
async fn update_moves_a_problem_to_another_delivery() {
    let ctx = TestContext::new();
    let recipient = ctx.recipient("Carla").await;
    let courier = ctx.deliveryman("Bruno", "bruno@fastfeet.com").await;
    let lamp = ctx.delivery("Lamp", recipient.id, courier.id).await;
    let chair = ctx.delivery("Chair", recipient.id, courier.id).await;
    let problem = ctx.problem(lamp.id, "Box crushed").await;
    let app = actix_test::init_service(ctx.app()).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/problems/{}", problem.id))
        .set_json(json!({"delivery_id": chair.id.get()}))
        .to_request();
    let updated: ProblemResponse = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(updated.description, "Box crushed");
    assert_eq!(updated.delivery.id, chair.id.get());

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/problems/{}", problem.id))
        .to_request();
    let shown: ProblemResponse = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(shown, updated);
}
