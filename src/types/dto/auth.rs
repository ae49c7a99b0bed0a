use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::internal::Principal;

/// Request model for obtaining a token pair
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing authentication tokens
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    pub refresh_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

/// Request model for token refresh
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token to exchange for a new access token
    pub refresh_token: String,
}

/// Response model for token refresh
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

/// Request model for logout
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to revoke
    pub refresh_token: String,
}

/// The authenticated caller as the server sees it
#[derive(Object, Debug)]
pub struct WhoAmIResponse {
    pub user_id: i32,
    pub username: String,
    pub is_superuser: bool,
    pub is_staff: bool,
    /// Names of the role-bearing groups the caller belongs to
    pub roles: Vec<String>,
}

impl From<&Principal> for WhoAmIResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            user_id: principal.user_id,
            username: principal.username.clone(),
            is_superuser: principal.is_superuser,
            is_staff: principal.is_staff,
            roles: principal
                .roles
                .iter()
                .map(|role| role.group_name().to_string())
                .collect(),
        }
    }
}
