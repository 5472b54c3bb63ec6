//! Deliverymen API handlers.
//!
//! ```text
//! GET    /api/v1/deliverymen?q=&page=
//! GET    /api/v1/deliverymen/{id}
//! POST   /api/v1/deliverymen       {"name":"Bruno","email":"bruno@fastfeet.com"}
//! PUT    /api/v1/deliverymen/{id}
//! DELETE /api/v1/deliverymen/{id}
//! ```

use actix_web::{delete, get, post, put, web};
use pagination::ListQuery;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Deliveryman, DeliverymanChanges, DeliverymanId, NewDeliveryman};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::responses::DeletedResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldRule, Schema, ValidationMode, validate_payload};

static CREATE_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("name").required(),
    FieldRule::string("email").required().email(),
    FieldRule::number("avatar_id"),
]);

static UPDATE_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("name"),
    FieldRule::string("email").email(),
    FieldRule::number("avatar_id"),
]);

/// Documented shape of create and update bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DeliverymanBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_id: Option<i32>,
}

/// Deliveryman projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliverymanResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub avatar_id: Option<i32>,
}

impl From<Deliveryman> for DeliverymanResponse {
    fn from(deliveryman: Deliveryman) -> Self {
        Self {
            id: deliveryman.id.get(),
            name: deliveryman.name,
            email: deliveryman.email.into(),
            avatar_id: deliveryman.avatar_id,
        }
    }
}

/// List deliverymen whose name contains `q`, ten per page.
#[utoipa::path(
    get,
    path = "/api/v1/deliverymen",
    params(
        ("q" = Option<String>, Query, description = "Case-insensitive name filter"),
        ("page" = Option<i64>, Query, description = "One-based page number")
    ),
    responses(
        (status = 200, description = "Deliverymen", body = [DeliverymanResponse]),
        (status = 400, description = "Invalid query", body = ErrorBody)
    ),
    tags = ["deliverymen"],
    operation_id = "listDeliverymen"
)]
#[get("/deliverymen")]
pub async fn list_deliverymen(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<DeliverymanResponse>>> {
    let deliverymen = state.deliverymen.list(&query).await?;
    Ok(web::Json(
        deliverymen.into_iter().map(DeliverymanResponse::from).collect(),
    ))
}

/// Fetch one deliveryman.
#[utoipa::path(
    get,
    path = "/api/v1/deliverymen/{id}",
    params(("id" = i32, Path, description = "Deliveryman id")),
    responses(
        (status = 200, description = "Deliveryman", body = DeliverymanResponse),
        (status = 404, description = "Deliveryman not found", body = ErrorBody)
    ),
    tags = ["deliverymen"],
    operation_id = "showDeliveryman"
)]
#[get("/deliverymen/{id}")]
pub async fn show_deliveryman(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<DeliverymanResponse>> {
    let deliveryman = state
        .deliverymen
        .show(DeliverymanId::new(path.into_inner()))
        .await?;
    Ok(web::Json(deliveryman.into()))
}

/// Register a deliveryman.
#[utoipa::path(
    post,
    path = "/api/v1/deliverymen",
    request_body = DeliverymanBody,
    responses(
        (status = 200, description = "Deliveryman created", body = DeliverymanResponse),
        (status = 400, description = "Validation fails", body = ErrorBody)
    ),
    tags = ["deliverymen"],
    operation_id = "createDeliveryman"
)]
#[post("/deliverymen")]
pub async fn create_deliveryman(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<DeliverymanResponse>> {
    let valid = validate_payload(&CREATE_SCHEMA, &payload, ValidationMode::AbortEarly)?;
    let deliveryman = state
        .deliverymen
        .create(NewDeliveryman {
            name: valid.require_text("name")?,
            email: valid.require_email("email")?,
            avatar_id: valid.number("avatar_id"),
        })
        .await?;
    Ok(web::Json(deliveryman.into()))
}

/// Update a deliveryman; absent fields are kept.
#[utoipa::path(
    put,
    path = "/api/v1/deliverymen/{id}",
    params(("id" = i32, Path, description = "Deliveryman id")),
    request_body = DeliverymanBody,
    responses(
        (status = 200, description = "Deliveryman updated", body = DeliverymanResponse),
        (status = 400, description = "Validation fails", body = ErrorBody),
        (status = 404, description = "Deliveryman not found", body = ErrorBody)
    ),
    tags = ["deliverymen"],
    operation_id = "updateDeliveryman"
)]
#[put("/deliverymen/{id}")]
pub async fn update_deliveryman(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<DeliverymanResponse>> {
    let valid = validate_payload(&UPDATE_SCHEMA, &payload, ValidationMode::AbortEarly)?;
    let changes = DeliverymanChanges {
        name: valid.text("name"),
        email: valid.email("email"),
        avatar_id: valid.number("avatar_id"),
    };
    let deliveryman = state
        .deliverymen
        .update(DeliverymanId::new(path.into_inner()), changes)
        .await?;
    Ok(web::Json(deliveryman.into()))
}

/// Delete a deliveryman together with their deliveries.
#[utoipa::path(
    delete,
    path = "/api/v1/deliverymen/{id}",
    params(("id" = i32, Path, description = "Deliveryman id")),
    responses(
        (status = 200, description = "Deliveryman deleted", body = DeletedResponse),
        (status = 404, description = "Deliveryman not found", body = ErrorBody)
    ),
    tags = ["deliverymen"],
    operation_id = "deleteDeliveryman"
)]
#[delete("/deliverymen/{id}")]
pub async fn delete_deliveryman(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<DeletedResponse>> {
    state
        .deliverymen
        .delete(DeliverymanId::new(path.into_inner()))
        .await?;
    Ok(web::Json(DeletedResponse::new("deliveryman")))
}
