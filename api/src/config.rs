//! Environment-driven configuration for the API binary.

use anyhow::Context;
use std::env;

use pw_core::domain::entities::session::{ACCESS_TOKEN_EXPIRY_MINUTES, REFRESH_TOKEN_EXPIRY_DAYS};
use pw_core::services::token::TokenServiceConfig;

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// MySQL connection string
    pub database_url: String,
    /// Upper bound on pooled database connections
    pub database_max_connections: u32,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh session expiry in days
    pub refresh_token_expiry_days: i64,
    /// Seconds between reaper sweeps
    pub cleanup_interval_seconds: u64,
    /// Bind host
    pub server_host: String,
    /// Bind port
    pub server_port: u16,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `DATABASE_URL` and `JWT_SECRET` are required; everything else has a
    /// development default.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        Ok(Self {
            database_url,
            database_max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            access_token_expiry_minutes: env_parse(
                "ACCESS_TOKEN_EXPIRY_MINUTES",
                ACCESS_TOKEN_EXPIRY_MINUTES,
            )?,
            refresh_token_expiry_days: env_parse(
                "REFRESH_TOKEN_EXPIRY_DAYS",
                REFRESH_TOKEN_EXPIRY_DAYS,
            )?,
            cleanup_interval_seconds: env_parse("CLEANUP_INTERVAL_SECS", 24 * 60 * 60)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env_parse("SERVER_PORT", 8080)?,
        })
    }

    /// Token service configuration derived from this config
    pub fn token_config(&self) -> TokenServiceConfig {
        TokenServiceConfig {
            jwt_secret: self.jwt_secret.clone(),
            access_token_expiry_minutes: self.access_token_expiry_minutes,
            refresh_token_expiry_days: self.refresh_token_expiry_days,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn env_parse<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("{name} must be a valid value")),
        Err(_) => Ok(default),
    }
}
