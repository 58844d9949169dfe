//! Configuration
//!
//! Loaded from an optional JSON file, then overridden from the
//! environment. Every field has a default so an absent file is valid.
//!
//! Environment overrides:
//! - `DATAAPI_DBCONN` - database connection URL
//! - `DATAAPI_PORT` - HTTP port
//! - `DATAAPI_LOGGING` - `on`/`off` for per-request logging

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::http_server::HttpServerConfig;

pub const ENV_DBCONN: &str = "DATAAPI_DBCONN";
pub const ENV_PORT: &str = "DATAAPI_PORT";
pub const ENV_LOGGING: &str = "DATAAPI_LOGGING";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which verses the verse lookup may return
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerseFilter {
    /// Everything not explicitly disallowed
    #[default]
    Permissive,
    /// Only verses explicitly allowed
    Strict,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// How long to wait for a pooled connection
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_database_url() -> String {
    "postgres://localhost/dataapi".to_string()
}

fn default_max_connections() -> usize {
    16
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Seconds between GeoJSON cache rebuilds; 0 never rebuilds
    #[serde(default)]
    pub geojson_refresh_secs: u64,

    #[serde(default)]
    pub verse_filter: VerseFilter,
}

impl Config {
    /// Load from `path` if it exists, apply environment overrides, validate.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file, falling back to defaults when it does not exist
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DBCONN) {
            self.database.url = url;
        }

        if let Some(port) = lookup(ENV_PORT) {
            self.http.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(ENV_PORT, format!("'{}' is not a port", port)))?;
        }

        if let Some(logging) = lookup(ENV_LOGGING) {
            self.http.request_logging = match logging.trim().to_ascii_lowercase().as_str() {
                "on" => true,
                "off" => false,
                other => {
                    return Err(ConfigError::invalid(
                        ENV_LOGGING,
                        format!("'{}' must be 'on' or 'off'", other),
                    ))
                }
            };
        }

        Ok(())
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::invalid("database.url", "must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid("database.max_connections", "must be > 0"));
        }
        if self.database.connect_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "database.connect_timeout_secs",
                "must be > 0",
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid("logging.level", "must not be empty"));
        }
        if let Err(e) = EnvFilter::try_new(&self.logging.level) {
            return Err(ConfigError::invalid("logging.level", e.to_string()));
        }
        Ok(())
    }

    /// Refresh interval for the GeoJSON cache, `None` when it never refreshes
    pub fn geojson_refresh(&self) -> Option<Duration> {
        (self.geojson_refresh_secs > 0).then(|| Duration::from_secs(self.geojson_refresh_secs))
    }
}
