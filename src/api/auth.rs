use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, SecurityScheme, Tags, auth::Bearer, payload::Json};

use crate::app_data::AppData;
use crate::api::helpers;
use crate::coordinators::AuthCoordinator;
use crate::errors::AuthError;
use crate::types::dto::auth::{
    LoginRequest, LogoutRequest, RefreshRequest, RefreshResponse, TokenResponse, WhoAmIResponse,
};
use crate::types::dto::common::MessageResponse;

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: Arc<AuthCoordinator>,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_coordinator: Arc::new(AuthCoordinator::new(app_data)),
        }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Exchange a username and password for an access and refresh token pair
    #[oai(path = "/token", method = "post", tag = "AuthTags::Authentication")]
    async fn token(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let tokens = self
            .auth_coordinator
            .login(&body.username, &body.password)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(TokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.expires_in,
        }))
    }

    /// Refresh access token using a refresh token
    #[oai(path = "/token/refresh", method = "post", tag = "AuthTags::Authentication")]
    async fn refresh(&self, body: Json<RefreshRequest>) -> Result<Json<RefreshResponse>, AuthError> {
        let (access_token, expires_in) = self
            .auth_coordinator
            .refresh(&body.refresh_token)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(RefreshResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }))
    }

    /// Logout and revoke refresh token
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<LogoutRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = helpers::request_context(req, &auth, &self.auth_coordinator)
            .await
            .map_err(AuthError::from_internal_error)?;

        self.auth_coordinator
            .logout(&ctx, &body.refresh_token)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(MessageResponse::new("Logged out successfully")))
    }

    /// The authenticated caller, as reloaded from the database
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request, auth: BearerAuth) -> Result<Json<WhoAmIResponse>, AuthError> {
        let ctx = helpers::request_context(req, &auth, &self.auth_coordinator)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(WhoAmIResponse::from(&ctx.principal)))
    }
}
