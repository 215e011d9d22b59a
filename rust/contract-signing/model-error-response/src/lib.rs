#![deny(missing_docs)]
//! Shared [ErrorResponse] body, split into its own crate so client crates
//! do not have to pull in the full model crate for error handling.

/// The JSON error body every handler returns on failure.
#[derive(serde::Serialize, serde::Deserialize, Debug, utoipa::ToSchema)]
pub struct ErrorResponse<'a> {
    /// Message to explain failure
    pub message: &'a str,
}

impl<'a> ErrorResponse<'a> {
    /// Wraps a message in an error body.
    pub fn new(message: &'a str) -> Self {
        ErrorResponse { message }
    }
}
