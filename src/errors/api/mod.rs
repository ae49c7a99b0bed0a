// API-facing error types
pub mod api_error;
pub mod auth;

use poem_openapi::Object;

// Re-exports for convenience
pub use api_error::ApiError;
pub use auth::AuthError;

use crate::errors::internal::ValidationError;

/// Rejected input field in an error body
#[derive(Object, Debug, Clone, PartialEq, Eq)]
pub struct FieldErrorResponse {
    /// Name of the request field
    pub field: String,

    /// Why the value was rejected
    pub message: String,
}

/// Standardized error body shared by every endpoint
#[derive(Object, Debug)]
pub struct ErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,

    /// Per-field details, empty unless the request failed validation
    pub field_errors: Vec<FieldErrorResponse>,
}

impl ErrorResponse {
    pub(crate) fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
            field_errors: Vec::new(),
        }
    }
}

impl From<&ValidationError> for Vec<FieldErrorResponse> {
    fn from(error: &ValidationError) -> Self {
        error
            .fields
            .iter()
            .map(|violation| FieldErrorResponse {
                field: violation.field.clone(),
                message: violation.message.clone(),
            })
            .collect()
    }
}
