use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Refresh token has expired")]
    ExpiredRefreshToken,

    /// Token was valid but its subject no longer exists
    #[error("Unknown principal: {user_id}")]
    UnknownPrincipal { user_id: String },

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),
}
