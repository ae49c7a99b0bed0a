use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::prelude::*;
use std::fmt;
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::services::crypto;
use crate::types::internal::auth::Claims;

/// Manages JWT token generation and validation
pub struct TokenService {
    jwt_secret: String,
    jwt_expiration_minutes: i64,
    refresh_expiration_days: i64,
    refresh_token_secret: String,
}

impl TokenService {
    pub fn new(
        jwt_secret: String,
        refresh_token_secret: String,
        jwt_expiration_minutes: i64,
        refresh_expiration_days: i64,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_expiration_minutes,
            refresh_expiration_days,
            refresh_token_secret,
        }
    }

    /// Generate an access token for the given user id
    ///
    /// Returns the encoded JWT and its expiry as a Unix timestamp (seconds).
    pub fn generate_jwt(&self, user_id: i32) -> Result<(String, i64), InternalError> {
        let now = Utc::now().timestamp();
        let expiration = now + (self.jwt_expiration_minutes * 60);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_encode", e.to_string()))?;

        Ok((token, expiration))
    }

    /// Validate a JWT and return its claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => CredentialError::ExpiredToken,
            _ => CredentialError::InvalidToken {
                reason: e.to_string(),
            },
        })?;

        Ok(token_data.claims)
    }

    /// Generate a cryptographically secure refresh token (32 random bytes, base64)
    pub fn generate_refresh_token(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        general_purpose::STANDARD.encode(random_bytes)
    }

    /// Hash a refresh token using HMAC-SHA256
    pub fn hash_refresh_token(&self, token: &str) -> String {
        crypto::hmac_sha256_token(&self.refresh_token_secret, token)
    }

    /// Expiry of a refresh token issued now, as Unix milliseconds
    pub fn get_refresh_expiration(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        now + (self.refresh_expiration_days * 24 * 60 * 60 * 1000)
    }

    pub fn access_token_seconds(&self) -> i64 {
        self.jwt_expiration_minutes * 60
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("refresh_expiration_days", &self.refresh_expiration_days)
            .field("refresh_token_secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenService {{ jwt_expiration: {}min, refresh_expiration: {}days }}",
            self.jwt_expiration_minutes, self.refresh_expiration_days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
    const REFRESH_SECRET: &str = "test-refresh-secret-minimum-32-chars";

    fn token_service() -> TokenService {
        TokenService::new(JWT_SECRET.to_string(), REFRESH_SECRET.to_string(), 15, 7)
    }

    #[test]
    fn test_jwt_round_trip_carries_user_id() {
        let service = token_service();

        let (token, _) = service.generate_jwt(42).unwrap();
        let claims = service.validate_jwt(&token).unwrap();

        assert_eq!(claims.user_id(), Some(42));
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_jwt_expiration_matches_configuration() {
        let service = token_service();

        let (token, expires_at) = service.generate_jwt(1).unwrap();
        let claims = service.validate_jwt(&token).unwrap();

        assert_eq!(claims.exp, expires_at);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_expired_jwt_is_rejected_as_expired() {
        let service = token_service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".to_string(),
            exp: now - 120,
            iat: now - 1000,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap();

        let result = service.validate_jwt(&token);

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::ExpiredToken))
        ));
    }

    #[test]
    fn test_jwt_signed_with_other_secret_is_invalid() {
        let other = TokenService::new(
            "another-secret-key-minimum-32-characters".to_string(),
            REFRESH_SECRET.to_string(),
            15,
            7,
        );
        let (token, _) = other.generate_jwt(1).unwrap();

        let result = token_service().validate_jwt(&token);

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
        ));
    }

    #[test]
    fn test_malformed_jwt_is_invalid() {
        let result = token_service().validate_jwt("not.a.jwt");

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
        ));
    }

    #[test]
    fn test_refresh_tokens_are_random_and_hash_stably() {
        let service = token_service();

        let first = service.generate_refresh_token();
        let second = service.generate_refresh_token();

        assert_ne!(first, second);
        assert_eq!(general_purpose::STANDARD.decode(&first).unwrap().len(), 32);
        assert_eq!(service.hash_refresh_token(&first), service.hash_refresh_token(&first));
        assert_ne!(service.hash_refresh_token(&first), first);
    }

    #[test]
    fn test_refresh_expiration_is_in_days() {
        let service = token_service();
        let now = Utc::now().timestamp_millis();

        let expires = service.get_refresh_expiration();

        let seven_days = 7 * 24 * 60 * 60 * 1000;
        assert!(expires >= now + seven_days);
        assert!(expires <= now + seven_days + 5_000);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", token_service());

        assert!(!rendered.contains(JWT_SECRET));
        assert!(rendered.contains("<redacted>"));
    }
}
