//! # Service Configuration Module
//!
//! Loads the settings of the availability service from environment
//! variables, with defaults where a value is optional.
//!
//! ## Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `DB_MAX_CONNECTIONS`: Connection pool size (default: 5)
//! - `LEGACY_CACHE_DIR`: Directory of per-owner JSON schedule caches (optional)
//! - `STORE_TIMEOUT_SECONDS`: Limit applied to each storage call by the binaries (default: 30)

use std::{env, path::PathBuf, time::Duration};

use eyre::{eyre, Result, WrapErr};
use tracing::Level;

/// Configuration for the availability service
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use priosync_service::config::ServiceConfig;
///
/// fn example() -> Result<()> {
///     let config = ServiceConfig::from_env()?;
///     println!("Using {} database connections", config.max_connections);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// Maximum number of pooled database connections
    pub max_connections: u32,

    /// Directory holding the file fallback cache, if any
    pub legacy_cache_dir: Option<PathBuf>,

    /// Storage call timeout in seconds
    pub store_timeout: u64,
}

impl ServiceConfig {
    /// Creates a new ServiceConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The DB_MAX_CONNECTIONS value cannot be parsed as a u32
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServiceConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database settings
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;
        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .wrap_err("Invalid DB_MAX_CONNECTIONS value")?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // Fallback cache settings
        let legacy_cache_dir = lookup("LEGACY_CACHE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let store_timeout = lookup("STORE_TIMEOUT_SECONDS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            database_url,
            log_level,
            max_connections,
            legacy_cache_dir,
            store_timeout,
        })
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout)
    }
}
