use thiserror::Error;

pub mod access;
pub mod credential;
pub mod database;
pub mod resource;
pub mod validation;

pub use access::AccessError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use resource::{ResourceError, ResourceKind};
pub use validation::{FieldViolation, ValidationError};

/// Internal error type for store, coordinator and service operations
///
/// Infrastructure errors (database, crypto) are shared; domain errors
/// carry what the API layer needs to pick a status code. Not exposed via API:
/// endpoints convert explicitly with `ApiError::from_internal_error` or
/// `AuthError::from_internal_error`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl InternalError {
    /// Create a database error with context
    pub fn database(operation: impl Into<String>, source: sea_orm::DbErr) -> Self {
        Self::Database(DatabaseError::Operation {
            operation: operation.into(),
            source,
        })
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> Self {
        Self::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> Self {
        Self::Database(DatabaseError::TransactionCommit { source })
    }

    /// Create a crypto error with context
    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: ResourceKind, id: impl ToString) -> Self {
        Self::Resource(ResourceError::NotFound {
            kind,
            id: id.to_string(),
        })
    }

    pub fn conflict(kind: ResourceKind, value: impl Into<String>) -> Self {
        Self::Resource(ResourceError::Conflict {
            kind,
            value: value.into(),
        })
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Access(AccessError::Denied {
            reason: reason.into(),
        })
    }
}
