//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler in the inbound HTTP layer together with
//! its request and response DTOs. The document is served by Swagger UI in
//! debug builds and exported via `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::deliveries::{CloseDeliveryBody, DeliveryBody, DeliveryResponse};
use crate::inbound::http::deliverymen::{DeliverymanBody, DeliverymanResponse};
use crate::inbound::http::delivery_problems::{
    CanceledDeliveryResponse, CreatedProblemResponse, DeliverymanContactResponse,
    ProblemBody, ProblemDeliveryRef, ProblemDeliveryTimeline, ProblemListItem, ProblemResponse,
};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::recipients::RecipientResponse;
use crate::inbound::http::responses::DeletedResponse;
use crate::inbound::http::users::{CreateUserBody, UpdateUserBody, UserResponse, UserSummary};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FastFeet backend API",
        description = "Back-office API for users, deliverymen, recipients, deliveries and delivery problems.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::show_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::deliverymen::list_deliverymen,
        crate::inbound::http::deliverymen::show_deliveryman,
        crate::inbound::http::deliverymen::create_deliveryman,
        crate::inbound::http::deliverymen::update_deliveryman,
        crate::inbound::http::deliverymen::delete_deliveryman,
        crate::inbound::http::recipients::list_recipients,
        crate::inbound::http::recipients::show_recipient,
        crate::inbound::http::recipients::create_recipient,
        crate::inbound::http::recipients::update_recipient,
        crate::inbound::http::recipients::delete_recipient,
        crate::inbound::http::deliveries::list_deliveries,
        crate::inbound::http::deliveries::show_delivery,
        crate::inbound::http::deliveries::create_delivery,
        crate::inbound::http::deliveries::update_delivery,
        crate::inbound::http::deliveries::delete_delivery,
        crate::inbound::http::deliveries::close_delivery,
        crate::inbound::http::delivery_problems::list_problems,
        crate::inbound::http::delivery_problems::list_delivery_problems,
        crate::inbound::http::delivery_problems::show_problem,
        crate::inbound::http::delivery_problems::create_problem,
        crate::inbound::http::delivery_problems::update_problem,
        crate::inbound::http::delivery_problems::cancel_delivery,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        DeletedResponse,
        CreateUserBody,
        UpdateUserBody,
        UserSummary,
        UserResponse,
        DeliverymanBody,
        DeliverymanResponse,
        RecipientResponse,
        DeliveryBody,
        CloseDeliveryBody,
        DeliveryResponse,
        ProblemBody,
        ProblemDeliveryTimeline,
        ProblemListItem,
        ProblemDeliveryRef,
        ProblemResponse,
        CreatedProblemResponse,
        DeliverymanContactResponse,
        CanceledDeliveryResponse,
    )),
    tags(
        (name = "users", description = "Administrator accounts"),
        (name = "deliverymen", description = "Couriers"),
        (name = "recipients", description = "Delivery addresses"),
        (name = "deliveries", description = "Deliveries and their hand-over"),
        (name = "problems", description = "Problem reports and cancellation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/v1/users")]
    #[case("/api/v1/deliverymen/{id}")]
    #[case("/api/v1/deliverymen/{deliveryman_id}/deliveries/{delivery_id}/close")]
    #[case("/api/v1/problems")]
    #[case("/api/v1/deliverymen/{id}/problems")]
    #[case("/health/ready")]
    fn document_lists_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn error_body_exposes_error_field() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("ErrorBody").expect("ErrorBody schema");
        assert_object_schema_has_field(error_schema, "error");
    }

    #[rstest]
    fn user_summary_has_no_password_field() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let summary = schemas.get("UserSummary").expect("UserSummary schema");
        assert_object_schema_has_field(summary, "admin");
        match summary {
            RefOr::T(Schema::Object(obj)) => {
                assert!(!obj.properties.contains_key("password_hash"));
            }
            _ => panic!("expected Object schema"),
        }
    }
}
