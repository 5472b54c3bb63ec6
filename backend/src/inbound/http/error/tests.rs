//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(response: HttpResponse) -> ErrorBody {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error body is JSON")
}

#[rstest]
#[case(Error::invalid_request("validation fails"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("email already exists"), StatusCode::UNAUTHORIZED)]
#[case(Error::not_found("problem not found"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("user store unavailable"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_their_message() {
    let response = Error::not_found("delivery not found")
        .with_trace_id(TRACE_ID)
        .error_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
    assert_eq!(body_of(response).await.error, "delivery not found");
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let response = Error::internal("relation \"deliveries\" does not exist").error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    assert_eq!(body_of(response).await.error, "Internal server error");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_validation_failure() {
    use actix_web::{App, test, web};

    async fn echo(body: web::Json<serde_json::Value>) -> HttpResponse {
        HttpResponse::Ok().json(body.into_inner())
    }

    let app = test::init_service(
        App::new()
            .app_data(json_config())
            .route("/", web::post().to(echo)),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(res).await;
    assert_eq!(body.error, VALIDATION_FAILS);
}
