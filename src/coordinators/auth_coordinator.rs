use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::services::TokenService;
use crate::stores::{CredentialStore, UserStore};
use crate::types::internal::context::RequestContext;
use crate::types::internal::Principal;

/// Tokens handed out by a successful login
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Authentication coordinator that orchestrates login, logout, token refresh
/// and bearer-token resolution
pub struct AuthCoordinator {
    db: DatabaseConnection,
    credential_store: Arc<CredentialStore>,
    user_store: Arc<UserStore>,
    token_service: Arc<TokenService>,
}

impl AuthCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            credential_store: app_data.credential_store.clone(),
            user_store: app_data.user_store.clone(),
            token_service: app_data.token_service.clone(),
        }
    }

    /// Verify credentials, then issue an access token and a stored refresh token
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedTokens, InternalError> {
        let user_id = self
            .credential_store
            .verify_credentials(&self.db, username, password)
            .await?;

        let (access_token, _expires_at) = self.token_service.generate_jwt(user_id)?;

        let refresh_token = self.token_service.generate_refresh_token();
        let token_hash = self.token_service.hash_refresh_token(&refresh_token);
        let expires_at = self.token_service.get_refresh_expiration();
        self.credential_store
            .store_refresh_token(&self.db, token_hash, user_id, expires_at)
            .await?;

        tracing::info!(user_id, "User logged in");

        Ok(IssuedTokens {
            access_token,
            refresh_token,
            expires_in: self.token_service.access_token_seconds(),
        })
    }

    /// Exchange a refresh token for a new access token
    ///
    /// Returns the token and its lifetime in seconds.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(String, i64), InternalError> {
        let token_hash = self.token_service.hash_refresh_token(refresh_token);
        let user_id = self
            .credential_store
            .validate_refresh_token(&self.db, &token_hash)
            .await?;

        if self.user_store.find_by_id(&self.db, user_id).await?.is_none() {
            return Err(CredentialError::InvalidRefreshToken.into());
        }

        let (access_token, _expires_at) = self.token_service.generate_jwt(user_id)?;
        Ok((access_token, self.token_service.access_token_seconds()))
    }

    /// Revoke one of the caller's refresh tokens
    pub async fn logout(&self, ctx: &RequestContext, refresh_token: &str) -> Result<(), InternalError> {
        let token_hash = self.token_service.hash_refresh_token(refresh_token);
        self.credential_store
            .revoke_refresh_token(&self.db, &token_hash, ctx.actor_id())
            .await?;

        tracing::info!(user_id = ctx.actor_id(), request_id = %ctx.request_id, "User logged out");
        Ok(())
    }

    /// Resolve a bearer token to the principal it acts for
    ///
    /// The principal is rebuilt from the database on every call, so group
    /// changes apply immediately and deleted users are rejected.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, InternalError> {
        let claims = self.token_service.validate_jwt(token)?;
        let user_id = claims.user_id().ok_or_else(|| CredentialError::InvalidToken {
            reason: format!("subject '{}' is not a user id", claims.sub),
        })?;

        self.user_store
            .load_principal(&self.db, user_id)
            .await?
            .ok_or_else(|| {
                CredentialError::UnknownPrincipal {
                    user_id: claims.sub.clone(),
                }
                .into()
            })
    }
}
