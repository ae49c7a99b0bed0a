use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::services::crypto;
use crate::types::db::refresh_token::{self, Entity as RefreshToken};
use crate::types::db::user::{self, Entity as User};
use crate::types::now_millis;

/// CredentialStore manages password hashes and refresh tokens
pub struct CredentialStore {
    password_pepper: String,
}

impl CredentialStore {
    /// Create a new CredentialStore with the server-side password pepper
    pub fn new(password_pepper: String) -> Self {
        Self { password_pepper }
    }

    /// Hash a plaintext password for storage
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        crypto::hash_password(&self.password_pepper, password)
    }

    /// Verify user credentials and return the user id on success
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to callers.
    pub async fn verify_credentials(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        password: &str,
    ) -> Result<i32, InternalError> {
        let user = User::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("verify_credentials", e))?
            .ok_or(CredentialError::InvalidCredentials)?;

        if !crypto::verify_password(&self.password_pepper, password, &user.password_hash)? {
            return Err(CredentialError::InvalidCredentials.into());
        }

        Ok(user.id)
    }

    /// Store the hash of a freshly issued refresh token
    pub async fn store_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: String,
        user_id: i32,
        expires_at: i64,
    ) -> Result<(), InternalError> {
        let new_token = refresh_token::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            token_hash: Set(token_hash),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            created_at: Set(now_millis()),
        };

        new_token
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("store_refresh_token", e))?;

        Ok(())
    }

    /// Validate a refresh token hash and return the owning user id
    pub async fn validate_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
    ) -> Result<i32, InternalError> {
        let token = RefreshToken::find()
            .filter(refresh_token::Column::TokenHash.eq(token_hash))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("validate_refresh_token", e))?
            .ok_or(CredentialError::InvalidRefreshToken)?;

        if token.expires_at < now_millis() {
            return Err(CredentialError::ExpiredRefreshToken.into());
        }

        Ok(token.user_id)
    }

    /// Revoke a refresh token held by `user_id`
    ///
    /// A token belonging to someone else is reported as invalid.
    pub async fn revoke_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
        user_id: i32,
    ) -> Result<(), InternalError> {
        let result = RefreshToken::delete_many()
            .filter(refresh_token::Column::TokenHash.eq(token_hash))
            .filter(refresh_token::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("revoke_refresh_token", e))?;

        if result.rows_affected == 0 {
            return Err(CredentialError::InvalidRefreshToken.into());
        }

        Ok(())
    }

    /// Drop every refresh token of a user
    pub async fn revoke_all_for_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<u64, InternalError> {
        let result = RefreshToken::delete_many()
            .filter(refresh_token::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("revoke_all_refresh_tokens", e))?;

        Ok(result.rows_affected)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
