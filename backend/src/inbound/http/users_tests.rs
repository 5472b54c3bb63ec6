//! HTTP tests for the users endpoints.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::UserRepository;
use crate::inbound::http::test_utils::TestContext;

async fn create(ctx: &TestContext, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(ctx.app()).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

async fn update(ctx: &TestContext, id: i32, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(ctx.app()).await;
    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/users/{id}"))
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

async fn seed_user(ctx: &TestContext, name: &str, email: &str) -> i32 {
    let (status, body) = create(
        ctx,
        json!({"name": name, "email": email, "password": "123456"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_i64().and_then(|id| i32::try_from(id).ok()).expect("numeric id")
}

#[rstest]
#[actix_web::test]
async fn create_returns_safe_projection() {
    let ctx = TestContext::new();
    let (status, body) = create(
        &ctx,
        json!({"name": "Ada", "email": "ada@fastfeet.com", "password": "123456"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "Ada", "email": "ada@fastfeet.com"}));
}

#[rstest]
#[case(json!({"email": "ada@fastfeet.com", "password": "123456"}))]
#[case(json!({"name": "Ada", "email": "not-an-email", "password": "123456"}))]
#[case(json!({"name": "Ada", "email": "ada@fastfeet.com", "password": "123"}))]
#[case(json!({"name": "Ada", "email": "ada@fastfeet.com", "password": "123456", "admin": "yes"}))]
#[case(json!([1, 2, 3]))]
#[actix_web::test]
async fn invalid_create_payloads_fail_validation(#[case] body: Value) {
    let ctx = TestContext::new();
    let (status, response) = create(&ctx, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({"error": "validation fails"}));
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_on_create_is_rejected() {
    let ctx = TestContext::new();
    seed_user(&ctx, "Ada", "ada@fastfeet.com").await;

    let (status, body) = create(
        &ctx,
        json!({"name": "Other", "email": "ada@fastfeet.com", "password": "123456"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "user already exists"}));
}

#[rstest]
#[actix_web::test]
async fn list_never_exposes_password_hashes() {
    let ctx = TestContext::new();
    seed_user(&ctx, "Ada", "ada@fastfeet.com").await;
    seed_user(&ctx, "Grace", "grace@fastfeet.com").await;

    let app = actix_test::init_service(ctx.app()).await;
    let request = actix_test::TestRequest::get().uri("/api/v1/users").to_request();
    let body: Vec<UserSummary> = actix_test::call_and_read_body_json(&app, request).await;

    let names: Vec<_> = body.iter().map(|user| user.name.as_str()).collect();
    assert_eq!(names, ["Ada", "Grace"]);
    let raw = serde_json::to_string(&body).expect("serialise users");
    assert!(!raw.contains("password"));
}

#[rstest]
#[actix_web::test]
async fn email_owned_by_another_user_is_unauthorized_and_leaves_row_unchanged() {
    let ctx = TestContext::new();
    let ada = seed_user(&ctx, "Ada", "ada@fastfeet.com").await;
    seed_user(&ctx, "Grace", "grace@fastfeet.com").await;

    let (status, body) = update(&ctx, ada, json!({"email": "grace@fastfeet.com"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "email already exists"}));

    let stored = UserRepository::find_by_id(ctx.store.as_ref(), UserId::new(ada))
        .await
        .expect("lookup")
        .expect("user exists");
    assert_eq!(stored.email.as_ref(), "ada@fastfeet.com");
}

#[rstest]
#[actix_web::test]
async fn wrong_old_password_is_unauthorized_and_keeps_hash() {
    let ctx = TestContext::new();
    let ada = seed_user(&ctx, "Ada", "ada@fastfeet.com").await;
    let before = UserRepository::find_by_id(ctx.store.as_ref(), UserId::new(ada))
        .await
        .expect("lookup")
        .expect("user exists")
        .password_hash;

    let (status, body) = update(
        &ctx,
        ada,
        json!({"old_password": "wrong-1", "password": "654321", "confirm_password": "654321"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "password does not match"}));

    let after = UserRepository::find_by_id(ctx.store.as_ref(), UserId::new(ada))
        .await
        .expect("lookup")
        .expect("user exists")
        .password_hash;
    assert_eq!(before, after);
}

#[rstest]
#[case(json!({"password": "654321", "confirm_password": "654321"}))]
#[case(json!({"old_password": "123456", "password": "654321"}))]
#[case(json!({"old_password": "123456", "password": "654321", "confirm_password": "000000"}))]
#[case(json!({"old_password": "123456"}))]
#[actix_web::test]
async fn inconsistent_password_fields_fail_validation(#[case] body: Value) {
    let ctx = TestContext::new();
    let ada = seed_user(&ctx, "Ada", "ada@fastfeet.com").await;

    let (status, response) = update(&ctx, ada, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({"error": "validation fails"}));
}

#[rstest]
#[actix_web::test]
async fn password_rotation_with_matching_old_password_succeeds() {
    let ctx = TestContext::new();
    let ada = seed_user(&ctx, "Ada", "ada@fastfeet.com").await;

    let (status, body) = update(
        &ctx,
        ada,
        json!({
            "name": "Ada L.",
            "old_password": "123456",
            "password": "654321",
            "confirm_password": "654321"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": ada, "name": "Ada L.", "email": "ada@fastfeet.com"}));
}

#[rstest]
#[actix_web::test]
async fn stray_confirmation_without_new_password_is_ignored() {
    let ctx = TestContext::new();
    let ada = seed_user(&ctx, "Ada", "ada@fastfeet.com").await;

    let (status, body) = update(&ctx, ada, json!({"name": "Ada", "confirm_password": "x"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": ada, "name": "Ada", "email": "ada@fastfeet.com"}));
}

#[rstest]
#[actix_web::test]
async fn show_and_delete_report_missing_users() {
    let ctx = TestContext::new();
    let ada = seed_user(&ctx, "Ada", "ada@fastfeet.com").await;
    let app = actix_test::init_service(ctx.app()).await;

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/users/{ada}"))
        .to_request();
    let deleted: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(deleted, json!({"message": "deleted user"}));

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/users/{ada}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({"error": "user not found"}));
}
