//! Domain entities, services and ports.
//!
//! Purpose: model the delivery back office (users, couriers, recipients,
//! deliveries and problem reports) independently of HTTP and storage.
//! Services depend only on the traits in [`ports`]; inbound adapters call
//! services and outbound adapters implement ports.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure with a stable code.
//! - Entity types and their `New*` / `*Changes` inputs.
//! - One service per resource.

pub mod error;
pub mod ports;

mod delivery;
mod delivery_problem;
mod delivery_problem_service;
mod delivery_service;
mod deliveryman;
mod deliveryman_service;
mod email;
mod ids;
mod mail;
mod recipient;
mod recipient_service;
mod service_support;
mod trace_id;
mod user;
mod user_service;

pub use self::delivery::{Delivery, DeliveryChanges, DeliverySnapshot, DeliveryStatus, NewDelivery};
pub use self::delivery_problem::{
    DeliveryProblem, DeliveryProblemChanges, NewDeliveryProblem, ProblemWithDelivery,
};
pub use self::delivery_problem_service::DeliveryProblemService;
pub use self::delivery_service::{CloseDeliveryRequest, DeliveryService};
pub use self::deliveryman::{
    Deliveryman, DeliverymanChanges, DeliverymanContact, NewDeliveryman,
};
pub use self::deliveryman_service::DeliverymanService;
pub use self::email::{Email, EmailValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, VALIDATION_FAILS};
pub use self::ids::{DeliveryId, DeliverymanId, ProblemId, RecipientId, UserId};
pub use self::mail::{CancellationMail, MailJob};
pub use self::recipient::{NewRecipient, Recipient, RecipientChanges};
pub use self::recipient_service::RecipientService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, PasswordHash, User, UserChanges};
pub use self::user_service::{CreateUserRequest, UpdateUserRequest, UserService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("delivery not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
