use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// An access-control predicate denied the action
    #[error("Access denied: {reason}")]
    Denied { reason: String },
}

impl AccessError {
    pub fn reason(&self) -> &str {
        match self {
            AccessError::Denied { reason } => reason,
        }
    }
}
