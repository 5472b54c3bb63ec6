//! Deliveries API handlers.
//!
//! ```text
//! GET    /api/v1/deliveries?q=&page=
//! GET    /api/v1/deliveries/{id}
//! POST   /api/v1/deliveries       {"product":"Lamp","recipient_id":1,"deliveryman_id":1}
//! PUT    /api/v1/deliveries/{id}
//! DELETE /api/v1/deliveries/{id}
//! PUT    /api/v1/deliverymen/{deliveryman_id}/deliveries/{delivery_id}/close
//! ```

use actix_web::{delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::ListQuery;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    CloseDeliveryRequest, Delivery, DeliveryChanges, DeliveryId, DeliverymanId, NewDelivery,
    RecipientId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::responses::DeletedResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldRule, Schema, ValidationMode, validate_payload};

static CREATE_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("product").required(),
    FieldRule::number("recipient_id").required(),
    FieldRule::number("deliveryman_id").required(),
]);

static UPDATE_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("product"),
    FieldRule::number("recipient_id"),
    FieldRule::number("deliveryman_id"),
]);

static CLOSE_SCHEMA: Schema = Schema::new(&[
    FieldRule::date("end_date").required(),
    FieldRule::number("signature_id").required(),
]);

/// Documented shape of create and update bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DeliveryBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliveryman_id: Option<i32>,
}

/// Documented shape of the close body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CloseDeliveryBody {
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[schema(example = "2024-05-01T15:30:00Z")]
    pub end_date: String,
    pub signature_id: i32,
}

/// Delivery projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryResponse {
    pub id: i32,
    pub product: String,
    pub recipient_id: i32,
    pub deliveryman_id: i32,
    pub signature_id: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

impl From<Delivery> for DeliveryResponse {
    fn from(delivery: Delivery) -> Self {
        Self {
            id: delivery.id.get(),
            product: delivery.product,
            recipient_id: delivery.recipient_id.get(),
            deliveryman_id: delivery.deliveryman_id.get(),
            signature_id: delivery.signature_id,
            start_date: delivery.start_date,
            end_date: delivery.end_date,
            canceled_at: delivery.canceled_at,
        }
    }
}

/// List deliveries whose product contains `q`, ten per page.
#[utoipa::path(
    get,
    path = "/api/v1/deliveries",
    params(
        ("q" = Option<String>, Query, description = "Case-insensitive product filter"),
        ("page" = Option<i64>, Query, description = "One-based page number")
    ),
    responses(
        (status = 200, description = "Deliveries", body = [DeliveryResponse]),
        (status = 400, description = "Invalid query", body = ErrorBody)
    ),
    tags = ["deliveries"],
    operation_id = "listDeliveries"
)]
#[get("/deliveries")]
pub async fn list_deliveries(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<DeliveryResponse>>> {
    let deliveries = state.deliveries.list(&query).await?;
    Ok(web::Json(
        deliveries.into_iter().map(DeliveryResponse::from).collect(),
    ))
}

/// Fetch one delivery.
#[utoipa::path(
    get,
    path = "/api/v1/deliveries/{id}",
    params(("id" = i32, Path, description = "Delivery id")),
    responses(
        (status = 200, description = "Delivery", body = DeliveryResponse),
        (status = 404, description = "Delivery not found", body = ErrorBody)
    ),
    tags = ["deliveries"],
    operation_id = "showDelivery"
)]
#[get("/deliveries/{id}")]
pub async fn show_delivery(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<DeliveryResponse>> {
    let delivery = state
        .deliveries
        .show(DeliveryId::new(path.into_inner()))
        .await?;
    Ok(web::Json(delivery.into()))
}

/// Register a delivery for an existing recipient and deliveryman.
#[utoipa::path(
    post,
    path = "/api/v1/deliveries",
    request_body = DeliveryBody,
    responses(
        (status = 200, description = "Delivery created", body = DeliveryResponse),
        (status = 400, description = "Validation fails", body = ErrorBody),
        (status = 404, description = "Recipient or deliveryman not found", body = ErrorBody)
    ),
    tags = ["deliveries"],
    operation_id = "createDelivery"
)]
#[post("/deliveries")]
pub async fn create_delivery(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<DeliveryResponse>> {
    let valid = validate_payload(&CREATE_SCHEMA, &payload, ValidationMode::AbortEarly)?;
    let delivery = state
        .deliveries
        .create(NewDelivery {
            product: valid.require_text("product")?,
            recipient_id: RecipientId::new(valid.require_number("recipient_id")?),
            deliveryman_id: DeliverymanId::new(valid.require_number("deliveryman_id")?),
        })
        .await?;
    Ok(web::Json(delivery.into()))
}

/// Update a delivery; changed references must exist.
#[utoipa::path(
    put,
    path = "/api/v1/deliveries/{id}",
    params(("id" = i32, Path, description = "Delivery id")),
    request_body = DeliveryBody,
    responses(
        (status = 200, description = "Delivery updated", body = DeliveryResponse),
        (status = 400, description = "Validation fails", body = ErrorBody),
        (status = 404, description = "Delivery or reference not found", body = ErrorBody)
    ),
    tags = ["deliveries"],
    operation_id = "updateDelivery"
)]
#[put("/deliveries/{id}")]
pub async fn update_delivery(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<DeliveryResponse>> {
    let valid = validate_payload(&UPDATE_SCHEMA, &payload, ValidationMode::AbortEarly)?;
    let changes = DeliveryChanges {
        product: valid.text("product"),
        recipient_id: valid.number("recipient_id").map(RecipientId::new),
        deliveryman_id: valid.number("deliveryman_id").map(DeliverymanId::new),
        ..DeliveryChanges::default()
    };
    let delivery = state
        .deliveries
        .update(DeliveryId::new(path.into_inner()), changes)
        .await?;
    Ok(web::Json(delivery.into()))
}

/// Delete a delivery and its problem reports.
#[utoipa::path(
    delete,
    path = "/api/v1/deliveries/{id}",
    params(("id" = i32, Path, description = "Delivery id")),
    responses(
        (status = 200, description = "Delivery deleted", body = DeletedResponse),
        (status = 404, description = "Delivery not found", body = ErrorBody)
    ),
    tags = ["deliveries"],
    operation_id = "deleteDelivery"
)]
#[delete("/deliveries/{id}")]
pub async fn delete_delivery(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<DeletedResponse>> {
    state
        .deliveries
        .delete(DeliveryId::new(path.into_inner()))
        .await?;
    Ok(web::Json(DeletedResponse::new("delivery")))
}

/// Close a delivery on behalf of its deliveryman.
///
/// The body is checked exhaustively so every failing field is logged.
#[utoipa::path(
    put,
    path = "/api/v1/deliverymen/{deliveryman_id}/deliveries/{delivery_id}/close",
    params(
        ("deliveryman_id" = i32, Path, description = "Deliveryman id"),
        ("delivery_id" = i32, Path, description = "Delivery id")
    ),
    request_body = CloseDeliveryBody,
    responses(
        (status = 200, description = "Delivery closed", body = DeliveryResponse),
        (status = 400, description = "Validation fails or delivery canceled", body = ErrorBody),
        (status = 404, description = "Deliveryman or delivery not found", body = ErrorBody)
    ),
    tags = ["deliveries"],
    operation_id = "closeDelivery"
)]
#[put("/deliverymen/{deliveryman_id}/deliveries/{delivery_id}/close")]
pub async fn close_delivery(
    state: web::Data<HttpState>,
    path: web::Path<(i32, i32)>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<DeliveryResponse>> {
    let (deliveryman_id, delivery_id) = path.into_inner();
    let valid = validate_payload(&CLOSE_SCHEMA, &payload, ValidationMode::Exhaustive)?;
    let request = CloseDeliveryRequest {
        end_date: valid.require_date("end_date")?,
        signature_id: valid.require_number("signature_id")?,
    };
    let delivery = state
        .deliveries
        .close(
            DeliverymanId::new(deliveryman_id),
            DeliveryId::new(delivery_id),
            request,
        )
        .await?;
    Ok(web::Json(delivery.into()))
}

#[cfg(test)]
#[path = "deliveries_tests.rs"]
mod tests;
