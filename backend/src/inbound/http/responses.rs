//! Response bodies shared by several resources.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Confirmation returned by delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    #[schema(example = "deleted recipient")]
    pub message: String,
}

impl DeletedResponse {
    /// `{"message": "deleted <resource>"}`.
    pub fn new(resource: &str) -> Self {
        Self {
            message: format!("deleted {resource}"),
        }
    }
}
