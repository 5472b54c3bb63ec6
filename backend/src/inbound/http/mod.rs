//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every resource lives under `/api/v1`. Handlers validate the raw JSON body
//! against a per-endpoint [`validation::Schema`], call one domain service and
//! shape the result into a projection DTO.

pub mod deliveries;
pub mod deliverymen;
pub mod delivery_problems;
pub mod error;
pub mod health;
pub mod recipients;
pub mod responses;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// The `/api/v1` scope with every resource handler registered.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::inbound::http::api_scope;
///
/// let app = App::new().service(api_scope());
/// # let _ = app;
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .service(users::list_users)
        .service(users::show_user)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(deliverymen::list_deliverymen)
        .service(deliverymen::show_deliveryman)
        .service(deliverymen::create_deliveryman)
        .service(deliverymen::update_deliveryman)
        .service(deliverymen::delete_deliveryman)
        .service(recipients::list_recipients)
        .service(recipients::show_recipient)
        .service(recipients::create_recipient)
        .service(recipients::update_recipient)
        .service(recipients::delete_recipient)
        .service(deliveries::list_deliveries)
        .service(deliveries::show_delivery)
        .service(deliveries::create_delivery)
        .service(deliveries::update_delivery)
        .service(deliveries::delete_delivery)
        .service(deliveries::close_delivery)
        .service(delivery_problems::list_problems)
        .service(delivery_problems::list_delivery_problems)
        .service(delivery_problems::show_problem)
        .service(delivery_problems::create_problem)
        .service(delivery_problems::update_problem)
        .service(delivery_problems::cancel_delivery)
}
