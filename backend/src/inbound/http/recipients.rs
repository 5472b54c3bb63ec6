//! Recipients API handlers.
//!
//! ```text
//! GET    /api/v1/recipients?q=&page=
//! GET    /api/v1/recipients/{id}
//! POST   /api/v1/recipients
//! PUT    /api/v1/recipients/{id}
//! DELETE /api/v1/recipients/{id}
//! ```

use actix_web::{delete, get, post, put, web};
use pagination::ListQuery;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{NewRecipient, Recipient, RecipientChanges, RecipientId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::responses::DeletedResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldRule, Schema, ValidPayload, ValidationMode, validate_payload,
};

static CREATE_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("name").required(),
    FieldRule::string("street").required(),
    FieldRule::number("number").required(),
    FieldRule::string("complement"),
    FieldRule::string("state").required(),
    FieldRule::string("city").required(),
    FieldRule::string("cep").required(),
]);

static UPDATE_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("name"),
    FieldRule::string("street"),
    FieldRule::number("number"),
    FieldRule::string("complement"),
    FieldRule::string("state"),
    FieldRule::string("city"),
    FieldRule::string("cep"),
]);

/// Recipient projection; also the documented request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipientResponse {
    pub id: i32,
    pub name: String,
    pub street: String,
    pub number: i32,
    pub complement: Option<String>,
    pub state: String,
    pub city: String,
    #[schema(example = "13000-000")]
    pub cep: String,
}

impl From<Recipient> for RecipientResponse {
    fn from(recipient: Recipient) -> Self {
        Self {
            id: recipient.id.get(),
            name: recipient.name,
            street: recipient.street,
            number: recipient.number,
            complement: recipient.complement,
            state: recipient.state,
            city: recipient.city,
            cep: recipient.cep,
        }
    }
}

fn new_recipient(valid: &ValidPayload) -> ApiResult<NewRecipient> {
    Ok(NewRecipient {
        name: valid.require_text("name")?,
        street: valid.require_text("street")?,
        number: valid.require_number("number")?,
        complement: valid.text("complement"),
        state: valid.require_text("state")?,
        city: valid.require_text("city")?,
        cep: valid.require_text("cep")?,
    })
}

/// List recipients whose name contains `q`, ten per page.
#[utoipa::path(
    get,
    path = "/api/v1/recipients",
    params(
        ("q" = Option<String>, Query, description = "Case-insensitive name filter"),
        ("page" = Option<i64>, Query, description = "One-based page number")
    ),
    responses(
        (status = 200, description = "Recipients", body = [RecipientResponse]),
        (status = 400, description = "Invalid query", body = ErrorBody)
    ),
    tags = ["recipients"],
    operation_id = "listRecipients"
)]
#[get("/recipients")]
pub async fn list_recipients(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<RecipientResponse>>> {
    let recipients = state.recipients.list(&query).await?;
    Ok(web::Json(
        recipients.into_iter().map(RecipientResponse::from).collect(),
    ))
}

/// Fetch one recipient.
#[utoipa::path(
    get,
    path = "/api/v1/recipients/{id}",
    params(("id" = i32, Path, description = "Recipient id")),
    responses(
        (status = 200, description = "Recipient", body = RecipientResponse),
        (status = 404, description = "Recipient not found", body = ErrorBody)
    ),
    tags = ["recipients"],
    operation_id = "showRecipient"
)]
#[get("/recipients/{id}")]
pub async fn show_recipient(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<RecipientResponse>> {
    let recipient = state
        .recipients
        .show(RecipientId::new(path.into_inner()))
        .await?;
    Ok(web::Json(recipient.into()))
}

/// Register a recipient.
#[utoipa::path(
    post,
    path = "/api/v1/recipients",
    request_body = RecipientResponse,
    responses(
        (status = 200, description = "Recipient created", body = RecipientResponse),
        (status = 400, description = "Validation fails", body = ErrorBody)
    ),
    tags = ["recipients"],
    operation_id = "createRecipient"
)]
#[post("/recipients")]
pub async fn create_recipient(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<RecipientResponse>> {
    let valid = validate_payload(&CREATE_SCHEMA, &payload, ValidationMode::AbortEarly)?;
    let recipient = state.recipients.create(new_recipient(&valid)?).await?;
    Ok(web::Json(recipient.into()))
}

/// Update a recipient; absent fields are kept.
#[utoipa::path(
    put,
    path = "/api/v1/recipients/{id}",
    params(("id" = i32, Path, description = "Recipient id")),
    request_body = RecipientResponse,
    responses(
        (status = 200, description = "Recipient updated", body = RecipientResponse),
        (status = 400, description = "Validation fails", body = ErrorBody),
        (status = 404, description = "Recipient not found", body = ErrorBody)
    ),
    tags = ["recipients"],
    operation_id = "updateRecipient"
)]
#[put("/recipients/{id}")]
pub async fn update_recipient(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<RecipientResponse>> {
    let valid = validate_payload(&UPDATE_SCHEMA, &payload, ValidationMode::AbortEarly)?;
    let changes = RecipientChanges {
        name: valid.text("name"),
        street: valid.text("street"),
        number: valid.number("number"),
        complement: valid.text("complement"),
        state: valid.text("state"),
        city: valid.text("city"),
        cep: valid.text("cep"),
    };
    let recipient = state
        .recipients
        .update(RecipientId::new(path.into_inner()), changes)
        .await?;
    Ok(web::Json(recipient.into()))
}

/// Delete a recipient together with their deliveries.
#[utoipa::path(
    delete,
    path = "/api/v1/recipients/{id}",
    params(("id" = i32, Path, description = "Recipient id")),
    responses(
        (status = 200, description = "Recipient deleted", body = DeletedResponse),
        (status = 404, description = "Recipient not found", body = ErrorBody)
    ),
    tags = ["recipients"],
    operation_id = "deleteRecipient"
)]
#[delete("/recipients/{id}")]
pub async fn delete_recipient(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<DeletedResponse>> {
    state
        .recipients
        .delete(RecipientId::new(path.into_inner()))
        .await?;
    Ok(web::Json(DeletedResponse::new("recipient")))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ports::DeliveryRepository;
    use crate::inbound::http::test_utils::TestContext;

    #[rstest]
    #[actix_web::test]
    async fn create_then_update_keeps_untouched_fields() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/recipients")
            .set_json(json!({
                "name": "Carla",
                "street": "Rua Dois",
                "number": 42,
                "state": "MG",
                "city": "Belo Horizonte",
                "cep": "30000-000"
            }))
            .to_request();
        let created: RecipientResponse = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(created.complement, None);

        let request = actix_test::TestRequest::put()
            .uri(&format!("/api/v1/recipients/{}", created.id))
            .set_json(json!({"complement": "Apto 3", "number": "43"}))
            .to_request();
        let updated: RecipientResponse = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(updated.complement.as_deref(), Some("Apto 3"));
        assert_eq!(updated.number, 43);
        assert_eq!(updated.city, "Belo Horizonte");
    }

    #[rstest]
    #[case(json!({"name": "Carla"}))]
    #[case(json!({"name": "Carla", "street": "Rua", "number": "x", "state": "MG", "city": "BH", "cep": "1"}))]
    #[actix_web::test]
    async fn incomplete_payload_fails_validation(#[case] body: serde_json::Value) {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/recipients")
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = actix_test::read_body_json(response).await;
        assert_eq!(body.error, "validation fails");
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_removes_the_recipients_deliveries() {
        let ctx = TestContext::new();
        let recipient = ctx.recipient("Carla").await;
        let courier = ctx.deliveryman("Bruno", "bruno@fastfeet.com").await;
        let delivery = ctx.delivery("Lamp", recipient.id, courier.id).await;
        let app = actix_test::init_service(ctx.app()).await;

        let request = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/recipients/{}", recipient.id))
            .to_request();
        let body: DeletedResponse = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body.message, "deleted recipient");

        let remaining = DeliveryRepository::find_by_id(ctx.store.as_ref(), delivery.id)
            .await
            .expect("lookup");
        assert_eq!(remaining, None);
    }
}
