pub use model_error_response::ErrorResponse;
use utoipa::ToSchema;

#[derive(serde::Serialize, serde::Deserialize, Debug, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct GenericSuccessResponse {
    /// Indicates if the request was successful
    pub success: bool,
}

impl Default for GenericSuccessResponse {
    fn default() -> Self {
        Self { success: true }
    }
}

/// Response body for bulk operations that report how many rows were touched.
#[derive(serde::Serialize, serde::Deserialize, Debug, Eq, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AffectedCountResponse {
    pub affected: usize,
}
