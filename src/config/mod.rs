//! Application configuration loaded from environment.

use std::net::SocketAddr;

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. `0.0.0.0:3000`).
    pub server_addr: SocketAddr,
    /// PostgreSQL connection URL. Required.
    pub database_url: String,
    /// JWT signing secret (min 32 chars). Required.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub access_token_ttl_secs: i64,
    /// How often the expired-revocation sweeper runs, in seconds.
    pub revoked_cleanup_interval_secs: u64,
    /// How long to wait for in-flight requests on shutdown, in seconds.
    pub shutdown_timeout_secs: u64,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let server_addr =
            std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ConfigLoadError::InvalidServerAddr)?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigLoadError::MissingDatabaseUrl)?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigLoadError::MissingJwtSecret)?;

        let access_token_ttl_secs = parse_or(
            "ACCESS_TOKEN_TTL_SECS",
            3600,
            ConfigLoadError::InvalidTokenTtl,
        )?;
        let revoked_cleanup_interval_secs = parse_or(
            "REVOKED_CLEANUP_INTERVAL_SECS",
            3600,
            ConfigLoadError::InvalidCleanupInterval,
        )?;
        let shutdown_timeout_secs = parse_or(
            "SHUTDOWN_TIMEOUT_SECS",
            30,
            ConfigLoadError::InvalidShutdownTimeout,
        )?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            server_addr,
            database_url,
            jwt_secret,
            access_token_ttl_secs,
            revoked_cleanup_interval_secs,
            shutdown_timeout_secs,
            log_level,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    default: T,
    err: ConfigLoadError,
) -> Result<T, ConfigLoadError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| err),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid SERVER_ADDR")]
    InvalidServerAddr,
    #[error("DATABASE_URL is required")]
    MissingDatabaseUrl,
    #[error("JWT_SECRET is required")]
    MissingJwtSecret,
    #[error("Invalid ACCESS_TOKEN_TTL_SECS")]
    InvalidTokenTtl,
    #[error("Invalid REVOKED_CLEANUP_INTERVAL_SECS")]
    InvalidCleanupInterval,
    #[error("Invalid SHUTDOWN_TIMEOUT_SECS")]
    InvalidShutdownTimeout,
}
