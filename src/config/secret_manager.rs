use std::fmt;

use crate::config::{ConfigError, EnvironmentProvider};

/// Where a secret comes from and how long it must be
struct SecretSpec {
    name: &'static str,
    min_length: usize,
}

const JWT_SECRET: SecretSpec = SecretSpec {
    name: "JWT_SECRET",
    min_length: 32,
};

const REFRESH_TOKEN_SECRET: SecretSpec = SecretSpec {
    name: "REFRESH_TOKEN_SECRET",
    min_length: 32,
};

const PASSWORD_PEPPER: SecretSpec = SecretSpec {
    name: "PASSWORD_PEPPER",
    min_length: 16,
};

/// Centralized holder of application secrets
pub struct SecretManager {
    jwt_secret: String,
    refresh_token_secret: String,
    password_pepper: String,
}

impl SecretManager {
    /// Load and validate every secret
    ///
    /// # Errors
    /// Returns `ConfigError` if a secret is missing or too short
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        Ok(Self {
            jwt_secret: Self::load_secret(env, &JWT_SECRET)?,
            refresh_token_secret: Self::load_secret(env, &REFRESH_TOKEN_SECRET)?,
            password_pepper: Self::load_secret(env, &PASSWORD_PEPPER)?,
        })
    }

    fn load_secret(env: &dyn EnvironmentProvider, spec: &SecretSpec) -> Result<String, ConfigError> {
        let value = env
            .get_var(spec.name)
            .ok_or_else(|| ConfigError::missing(spec.name))?;

        if value.len() < spec.min_length {
            return Err(ConfigError::TooShort {
                name: spec.name.to_string(),
                expected: spec.min_length,
                actual: value.len(),
            });
        }

        Ok(value)
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn refresh_token_secret(&self) -> &str {
        &self.refresh_token_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 3 }}")
    }
}
