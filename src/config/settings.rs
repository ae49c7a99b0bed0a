use std::fmt;
use std::str::FromStr;

use crate::config::{ConfigError, EnvironmentProvider, SecretManager, SystemEnvironment};

const DEFAULT_DATABASE_URL: &str = "sqlite://helpdesk.db?mode=rwc";

/// Everything the service needs to start
pub struct Settings {
    database_url: String,
    server_host: String,
    server_port: u16,
    access_token_minutes: i64,
    refresh_token_days: i64,
    secrets: SecretManager,
}

impl Settings {
    /// Load settings through an environment provider
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let database_url = env
            .get_var("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let server_host = env
            .get_var("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port = parse_or_default(env, "PORT", 3000u16, "port number between 1 and 65535")?;
        if server_port == 0 {
            return Err(ConfigError::invalid_format(
                "PORT",
                "port number between 1 and 65535",
                "0",
            ));
        }
        let access_token_minutes =
            parse_positive(env, "ACCESS_TOKEN_MINUTES", 15, "positive number of minutes")?;
        let refresh_token_days =
            parse_positive(env, "REFRESH_TOKEN_DAYS", 7, "positive number of days")?;

        Ok(Self {
            database_url,
            server_host,
            server_port,
            access_token_minutes,
            refresh_token_days,
            secrets: SecretManager::from_env_provider(env)?,
        })
    }

    /// Convenience method that reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn access_token_minutes(&self) -> i64 {
        self.access_token_minutes
    }

    pub fn refresh_token_days(&self) -> i64 {
        self.refresh_token_days
    }

    pub fn secrets(&self) -> &SecretManager {
        &self.secrets
    }
}

fn parse_or_default<T: FromStr>(
    env: &dyn EnvironmentProvider,
    name: &str,
    default: T,
    expected: &str,
) -> Result<T, ConfigError> {
    match env.get_var(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid_format(name, expected, &raw)),
    }
}

fn parse_positive(
    env: &dyn EnvironmentProvider,
    name: &str,
    default: i64,
    expected: &str,
) -> Result<i64, ConfigError> {
    let value = parse_or_default(env, name, default, expected)?;
    if value <= 0 {
        return Err(ConfigError::invalid_format(name, expected, &value.to_string()));
    }
    Ok(value)
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("secrets", &self.secrets)
            .finish()
    }
}
