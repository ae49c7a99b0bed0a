use thiserror::Error;

/// Startup configuration failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Required setting '{name}' is missing")]
    Missing { name: String },

    #[error("Setting '{name}' must be at least {expected} characters, got {actual}")]
    TooShort {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Setting '{name}' has invalid format. Expected: {expected}, got: {actual}")]
    InvalidFormat {
        name: String,
        expected: String,
        actual: String,
    },
}

impl ConfigError {
    pub fn missing(name: &str) -> Self {
        Self::Missing {
            name: name.to_string(),
        }
    }

    pub fn invalid_format(name: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidFormat {
            name: name.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
