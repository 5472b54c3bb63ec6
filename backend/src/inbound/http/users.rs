//! Users API handlers.
//!
//! ```text
//! GET    /api/v1/users
//! GET    /api/v1/users/{id}
//! POST   /api/v1/users       {"name":"Ada","email":"ada@fastfeet.com","password":"123456"}
//! PUT    /api/v1/users/{id}  {"old_password":"123456","password":"654321","confirm_password":"654321"}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{CreateUserRequest, UpdateUserRequest, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::responses::DeletedResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldRule, Schema, ValidationMode, validate_payload};

static CREATE_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("name").required(),
    FieldRule::string("email").required().email(),
    FieldRule::string("password").required().min_len(6),
    FieldRule::boolean("admin"),
]);

static UPDATE_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("name"),
    FieldRule::string("email").email(),
    FieldRule::string("old_password").min_len(6),
    FieldRule::string("password")
        .min_len(6)
        .required_with("old_password")
        .only_with("old_password"),
    FieldRule::string("confirm_password")
        .required_with("password")
        .equal_to("password"),
]);

/// Documented shape of the create body; handlers validate the raw JSON
/// against `CREATE_SCHEMA`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateUserBody {
    pub name: String,
    pub email: String,
    #[schema(min_length = 6)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
}

/// Documented shape of the update body. `password` needs `old_password`;
/// `confirm_password` must repeat `password`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

/// User listing projection; never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    #[schema(example = "admin@fastfeet.com")]
    pub email: String,
    pub admin: bool,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name,
            email: user.email.into(),
            admin: user.admin,
        }
    }
}

/// Projection returned after create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name,
            email: user.email.into(),
        }
    }
}

/// List every user ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserSummary]),
        (status = 503, description = "Store unavailable", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserSummary>>> {
    let users = state.users.list().await?;
    Ok(web::Json(users.into_iter().map(UserSummary::from).collect()))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserSummary),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "showUser"
)]
#[get("/users/{id}")]
pub async fn show_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<UserSummary>> {
    let user = state.users.show(UserId::new(path.into_inner())).await?;
    Ok(web::Json(user.into()))
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserBody,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Validation fails or user already exists", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<UserResponse>> {
    let valid = validate_payload(&CREATE_SCHEMA, &payload, ValidationMode::AbortEarly)?;
    let request = CreateUserRequest {
        name: valid.require_text("name")?,
        email: valid.require_email("email")?,
        password: valid.require_text("password")?,
        admin: valid.boolean("admin").unwrap_or(false),
    };
    let user = state.users.create(request).await?;
    Ok(web::Json(user.into()))
}

/// Update profile fields and optionally rotate the password.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation fails", body = ErrorBody),
        (status = 401, description = "E-mail taken or old password mismatch", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<UserResponse>> {
    let valid = validate_payload(&UPDATE_SCHEMA, &payload, ValidationMode::AbortEarly)?;
    let request = UpdateUserRequest {
        name: valid.text("name"),
        email: valid.email("email"),
        old_password: valid.text("old_password"),
        password: valid.text("password"),
    };
    let user = state
        .users
        .update(UserId::new(path.into_inner()), request)
        .await?;
    Ok(web::Json(user.into()))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = DeletedResponse),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<DeletedResponse>> {
    state.users.delete(UserId::new(path.into_inner())).await?;
    Ok(web::Json(DeletedResponse::new("user")))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
