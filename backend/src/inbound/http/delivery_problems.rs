//! Delivery problem API handlers.
//!
//! ```text
//! GET    /api/v1/problems?problemQuery=&page=
//! GET    /api/v1/deliveries/{id}/problems
//! GET    /api/v1/problems/{id}
//! POST   /api/v1/deliverymen/{id}/problems   {"delivery_id":1,"description":"Box crushed"}
//! PUT    /api/v1/problems/{id}
//! DELETE /api/v1/problems/{id}                cancels the reported delivery
//! ```

use actix_web::{delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::ListQuery;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Delivery, DeliveryId, DeliveryProblem, DeliveryProblemChanges, DeliverySnapshot,
    DeliverymanId, NewDeliveryProblem, ProblemId, ProblemWithDelivery,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::deliveries::DeliveryResponse;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldRule, Schema, ValidationMode, validate_payload};

static CREATE_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("description").required(),
    FieldRule::number("delivery_id").required(),
]);

static UPDATE_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("description"),
    FieldRule::number("delivery_id"),
]);

/// Query string of the problem listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProblemListQuery {
    /// Case-insensitive description filter.
    #[serde(default, rename = "problemQuery")]
    pub problem_query: Option<String>,
    /// One-based page number.
    #[serde(default)]
    pub page: Option<i64>,
}

impl From<ProblemListQuery> for ListQuery {
    fn from(value: ProblemListQuery) -> Self {
        Self {
            q: value.problem_query,
            page: value.page,
        }
    }
}

/// Documented shape of create and update bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProblemBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<i32>,
}

/// Delivery fields shown next to a listed problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDeliveryTimeline {
    pub id: i32,
    pub product: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

/// Problem as it appears in the paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemListItem {
    pub id: i32,
    pub description: String,
    pub delivery: ProblemDeliveryTimeline,
}

impl From<ProblemWithDelivery> for ProblemListItem {
    fn from(value: ProblemWithDelivery) -> Self {
        let ProblemWithDelivery { problem, delivery } = value;
        Self {
            id: problem.id.get(),
            description: problem.description,
            delivery: ProblemDeliveryTimeline {
                id: delivery.id.get(),
                product: delivery.product,
                start_date: delivery.start_date,
                end_date: delivery.end_date,
                canceled_at: delivery.canceled_at,
            },
        }
    }
}

/// Minimal delivery reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDeliveryRef {
    pub id: i32,
    pub product: String,
}

/// Problem with a reference to its delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemResponse {
    pub id: i32,
    pub description: String,
    pub delivery: ProblemDeliveryRef,
}

impl ProblemResponse {
    fn new(problem: DeliveryProblem, delivery: &Delivery) -> Self {
        Self {
            id: problem.id.get(),
            description: problem.description,
            delivery: ProblemDeliveryRef {
                id: delivery.id.get(),
                product: delivery.product.clone(),
            },
        }
    }
}

impl From<ProblemWithDelivery> for ProblemResponse {
    fn from(value: ProblemWithDelivery) -> Self {
        Self::new(value.problem, &value.delivery)
    }
}

/// Newly filed problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedProblemResponse {
    pub id: i32,
    pub description: String,
    pub delivery_id: i32,
}

impl From<DeliveryProblem> for CreatedProblemResponse {
    fn from(problem: DeliveryProblem) -> Self {
        Self {
            id: problem.id.get(),
            description: problem.description,
            delivery_id: problem.delivery_id.get(),
        }
    }
}

/// Courier contact embedded in a cancelled delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliverymanContactResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Cancelled delivery with its courier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CanceledDeliveryResponse {
    #[serde(flatten)]
    pub delivery: DeliveryResponse,
    pub deliveryman: DeliverymanContactResponse,
}

impl From<DeliverySnapshot> for CanceledDeliveryResponse {
    fn from(snapshot: DeliverySnapshot) -> Self {
        let DeliverySnapshot {
            delivery,
            deliveryman,
        } = snapshot;
        Self {
            delivery: delivery.into(),
            deliveryman: DeliverymanContactResponse {
                id: deliveryman.id.get(),
                name: deliveryman.name,
                email: deliveryman.email.into(),
            },
        }
    }
}

/// List problems whose description contains `problemQuery`, four per page.
#[utoipa::path(
    get,
    path = "/api/v1/problems",
    params(ProblemListQuery),
    responses(
        (status = 200, description = "Problems", body = [ProblemListItem]),
        (status = 400, description = "Invalid query", body = ErrorBody)
    ),
    tags = ["problems"],
    operation_id = "listProblems"
)]
#[get("/problems")]
pub async fn list_problems(
    state: web::Data<HttpState>,
    query: web::Query<ProblemListQuery>,
) -> ApiResult<web::Json<Vec<ProblemListItem>>> {
    let query = ListQuery::from(query.into_inner());
    let problems = state.problems.list(&query).await?;
    Ok(web::Json(
        problems.into_iter().map(ProblemListItem::from).collect(),
    ))
}

/// All problems reported against one delivery.
#[utoipa::path(
    get,
    path = "/api/v1/deliveries/{id}/problems",
    params(("id" = i32, Path, description = "Delivery id")),
    responses(
        (status = 200, description = "Problems of the delivery", body = [ProblemResponse]),
        (status = 404, description = "Delivery not found", body = ErrorBody)
    ),
    tags = ["problems"],
    operation_id = "listDeliveryProblems"
)]
#[get("/deliveries/{id}/problems")]
pub async fn list_delivery_problems(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<ProblemResponse>>> {
    let problems = state
        .problems
        .list_for_delivery(DeliveryId::new(path.into_inner()))
        .await?;
    Ok(web::Json(
        problems.into_iter().map(ProblemResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/problems/{id}",
    params(("id" = i32, Path, description = "Problem id")),
    responses(
        (status = 200, description = "Problem", body = ProblemResponse),
        (status = 404, description = "Problem not found", body = ErrorBody)
    ),
    tags = ["problems"],
    operation_id = "showProblem"
)]
#[get("/problems/{id}")]
pub async fn show_problem(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<ProblemResponse>> {
    let problem = state.problems.show(ProblemId::new(path.into_inner())).await?;
    Ok(web::Json(problem.into()))
}

/// File a problem on behalf of a courier.
#[utoipa::path(
    post,
    path = "/api/v1/deliverymen/{id}/problems",
    params(("id" = i32, Path, description = "Deliveryman id")),
    request_body = ProblemBody,
    responses(
        (status = 200, description = "Problem filed", body = CreatedProblemResponse),
        (status = 400, description = "Validation fails", body = ErrorBody),
        (status = 404, description = "Delivery or deliveryman not found", body = ErrorBody)
    ),
    tags = ["problems"],
    operation_id = "createProblem"
)]
#[post("/deliverymen/{id}/problems")]
pub async fn create_problem(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<CreatedProblemResponse>> {
    let valid = validate_payload(&CREATE_SCHEMA, &payload, ValidationMode::AbortEarly)?;
    let problem = NewDeliveryProblem {
        delivery_id: DeliveryId::new(valid.require_number("delivery_id")?),
        description: valid.require_text("description")?,
    };
    let created = state
        .problems
        .create(DeliverymanId::new(path.into_inner()), problem)
        .await?;
    Ok(web::Json(created.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/problems/{id}",
    params(("id" = i32, Path, description = "Problem id")),
    request_body = ProblemBody,
    responses(
        (status = 200, description = "Problem updated", body = ProblemResponse),
        (status = 400, description = "Validation fails", body = ErrorBody),
        (status = 404, description = "Problem or delivery not found", body = ErrorBody)
    ),
    tags = ["problems"],
    operation_id = "updateProblem"
)]
#[put("/problems/{id}")]
pub async fn update_problem(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<ProblemResponse>> {
    let valid = validate_payload(&UPDATE_SCHEMA, &payload, ValidationMode::AbortEarly)?;
    let changes = DeliveryProblemChanges {
        delivery_id: valid.number("delivery_id").map(DeliveryId::new),
        description: valid.text("description"),
    };
    let updated = state
        .problems
        .update(ProblemId::new(path.into_inner()), changes)
        .await?;
    Ok(web::Json(updated.into()))
}

/// Cancel the delivery a problem refers to and notify its courier.
///
/// The problem itself is kept.
#[utoipa::path(
    delete,
    path = "/api/v1/problems/{id}",
    params(("id" = i32, Path, description = "Problem id")),
    responses(
        (status = 200, description = "Delivery cancelled", body = CanceledDeliveryResponse),
        (status = 404, description = "Problem or delivery not found", body = ErrorBody),
        (status = 500, description = "Cancellation mail could not be queued", body = ErrorBody)
    ),
    tags = ["problems"],
    operation_id = "cancelDelivery"
)]
#[delete("/problems/{id}")]
pub async fn cancel_delivery(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<CanceledDeliveryResponse>> {
    let snapshot = state
        .problems
        .cancel_delivery(ProblemId::new(path.into_inner()))
        .await?;
    Ok(web::Json(snapshot.into()))
}

#[cfg(test)]
#[path = "delivery_problems_tests.rs"]
mod tests;
