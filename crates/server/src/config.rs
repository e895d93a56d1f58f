//! Server configuration loaded from environment variables.
//!
//! Every variable is optional; the defaults describe a single local instance
//! listening on port 3000 with its cart table in `cart_database.db`.
//!
//! # Environment Variables
//!
//! - `BASKET_HOST` - Bind address (default: 127.0.0.1)
//! - `BASKET_PORT` - Listen port (default: 3000)
//! - `BASKET_DATABASE_PATH` - SQLite database file (default: `cart_database.db`)
//! - `BASKET_PUBLIC_DIR` - Directory of static assets served verbatim (default: `public`)
//! - `BASKET_SECURE_COOKIES` - Mark the session cookie `Secure` (default: false)
//! - `BASKET_RETENTION_DAYS` - Days of inactivity before a cart entry is purged (default: 7)
//! - `BASKET_SWEEP_INTERVAL_SECS` - Seconds between retention sweeps (default: 3600)
//! - `BASKET_MAX_CART_ITEMS` - Maximum entries returned for one cart (default: 500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_DATABASE_PATH: &str = "cart_database.db";
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_RETENTION_DAYS: u64 = 7;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60;
const DEFAULT_MAX_CART_ITEMS: u32 = 500;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// SQLite database file holding the `carts` table
    pub database_path: PathBuf,
    /// Directory whose files are served as static assets
    pub public_dir: PathBuf,
    /// Whether the session cookie carries the `Secure` attribute
    pub secure_cookies: bool,
    /// Cart retention and sweep schedule
    pub retention: RetentionConfig,
    /// Maximum number of entries returned when reading one cart
    pub max_cart_items: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Retention window and sweep interval for abandoned carts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Entries whose last activity is older than this are purged.
    pub window: Duration,
    /// Time between two sweeps.
    pub sweep_interval: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(DEFAULT_RETENTION_DAYS * SECONDS_PER_DAY),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            secure_cookies: false,
            retention: RetentionConfig::default(),
            max_cart_items: DEFAULT_MAX_CART_ITEMS,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or if
    /// a duration or limit is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default("BASKET_HOST", "127.0.0.1")?;
        let port = parse_env_or_default("BASKET_PORT", "3000")?;
        let database_path = PathBuf::from(get_env_or_default(
            "BASKET_DATABASE_PATH",
            DEFAULT_DATABASE_PATH,
        ));
        let public_dir = PathBuf::from(get_env_or_default("BASKET_PUBLIC_DIR", DEFAULT_PUBLIC_DIR));
        let secure_cookies = parse_env_or_default("BASKET_SECURE_COOKIES", "false")?;

        let retention_days: u64 =
            parse_env_or_default("BASKET_RETENTION_DAYS", &DEFAULT_RETENTION_DAYS.to_string())?;
        require_positive("BASKET_RETENTION_DAYS", retention_days)?;
        let window_secs = retention_days.checked_mul(SECONDS_PER_DAY).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "BASKET_RETENTION_DAYS".to_string(),
                "retention window overflows".to_string(),
            )
        })?;

        let sweep_secs: u64 = parse_env_or_default(
            "BASKET_SWEEP_INTERVAL_SECS",
            &DEFAULT_SWEEP_INTERVAL_SECS.to_string(),
        )?;
        require_positive("BASKET_SWEEP_INTERVAL_SECS", sweep_secs)?;

        let max_cart_items: u32 =
            parse_env_or_default("BASKET_MAX_CART_ITEMS", &DEFAULT_MAX_CART_ITEMS.to_string())?;
        require_positive("BASKET_MAX_CART_ITEMS", u64::from(max_cart_items))?;

        Ok(Self {
            host,
            port,
            database_path,
            public_dir,
            secure_cookies,
            retention: RetentionConfig {
                window: Duration::from_secs(window_secs),
                sweep_interval: Duration::from_secs(sweep_secs),
            },
            max_cart_items,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating an empty value as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn require_positive(key: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
