use crate::errors::api::{ErrorResponse, FieldErrorResponse};
use crate::errors::internal::{
    AccessError, CredentialError, InternalError, ResourceError, ValidationError,
};
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Error taxonomy for ticket and administration endpoints
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Missing, invalid or expired credentials
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// The caller may not perform this action
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Resource does not exist or is not visible to the caller
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// One or more request fields were rejected
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// A unique value is already taken
    #[oai(status = 400)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(Json(ErrorResponse::new("unauthorized", message, 401)))
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        ApiError::Forbidden(Json(ErrorResponse::new("forbidden", reason, 403)))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Json(ErrorResponse::new("not_found", message, 404)))
    }

    pub fn validation_failed(error: &ValidationError) -> Self {
        let mut body = ErrorResponse::new("validation_failed", "Request validation failed", 400);
        body.field_errors = Vec::<FieldErrorResponse>::from(error);
        ApiError::ValidationFailed(Json(body))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(Json(ErrorResponse::new("conflict", message, 400)))
    }

    /// Convert InternalError to ApiError
    ///
    /// Infrastructure failures are logged and reported generically.
    pub fn from_internal_error(err: InternalError) -> Self {
        match err {
            InternalError::Database(ref source) => {
                tracing::error!("Database failure: {}", source);
                Self::internal_server_error()
            }
            InternalError::Crypto { ref operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }
            InternalError::Credential(CredentialError::PasswordHashingFailed(ref message)) => {
                tracing::error!("Password hashing failed: {}", message);
                Self::internal_server_error()
            }
            InternalError::Credential(ref credential) => {
                tracing::debug!("Rejected credentials: {}", credential);
                Self::unauthorized("Authentication credentials were not provided or are invalid")
            }
            InternalError::Access(AccessError::Denied { ref reason }) => {
                tracing::debug!("Access denied: {}", reason);
                Self::forbidden(format!(
                    "You do not have permission to perform this action: {}",
                    reason
                ))
            }
            InternalError::Resource(ResourceError::NotFound { kind, .. }) => {
                Self::not_found(format!("{} not found", kind))
            }
            InternalError::Resource(ResourceError::Conflict { kind, ref value }) => {
                Self::conflict(format!("{} '{}' already exists", kind, value))
            }
            InternalError::Validation(ref validation) => {
                tracing::debug!("{}", validation);
                Self::validation_failed(validation)
            }
        }
    }

    fn internal_server_error() -> Self {
        ApiError::InternalError(Json(ErrorResponse::new(
            "internal_error",
            "An internal error occurred",
            500,
        )))
    }

    pub(crate) fn body(&self) -> &ErrorResponse {
        match self {
            ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::ValidationFailed(json)
            | ApiError::Conflict(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }

    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
