//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `hygrolog.toml` in the working directory. Every field except the
//! sensor address has a sensible default so the file is optional when
//! `HYGROLOG_SENSOR_ADDRESS` is set. Environment variables take precedence
//! over file values.

use std::time::Duration;

use serde::Deserialize;

use hygrolog_adapter_ble::SensorConfig;
use hygrolog_adapter_ble::parser::normalize_address;
use hygrolog_app::services::collection_scheduler::DEFAULT_INTERVAL;
use hygrolog_domain::error::ValidationError;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Thermometer address, characteristic and stage timeouts.
    pub sensor: SensorConfig,
    /// Collection loop settings.
    pub collector: CollectorConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

// 15 minutes, always fits
#[allow(clippy::cast_possible_truncation)]
const DEFAULT_POLL_MINUTES: u32 = (DEFAULT_INTERVAL.as_secs() / 60) as u32;

/// Collection loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Minutes to sleep after each cycle.
    pub poll_interval_minutes: u32,
}

impl CollectorConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.poll_interval_minutes) * 60)
    }
}

impl Config {
    /// Load configuration from `hygrolog.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("hygrolog.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("HYGROLOG_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("HYGROLOG_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Some(val) = var("HYGROLOG_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("HYGROLOG_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("HYGROLOG_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("HYGROLOG_SENSOR_ADDRESS") {
            self.sensor.address = val;
        }
        if let Some(val) = var("HYGROLOG_POLL_INTERVAL_MINUTES")
            && let Ok(minutes) = val.parse()
        {
            self.collector.poll_interval_minutes = minutes;
        }
    }

    /// Check the configuration and normalise the sensor address to upper case.
    fn validate(&mut self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.sensor.address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "sensor.address must be set".to_string(),
            ));
        }
        self.sensor.address = normalize_address(&self.sensor.address)?;
        if self.collector.poll_interval_minutes == 0 {
            return Err(ConfigError::Validation(
                "collector.poll_interval_minutes must be non-zero".to_string(),
            ));
        }
        let timeouts = [
            ("discover_timeout_secs", self.sensor.discover_timeout_secs),
            ("connect_timeout_secs", self.sensor.connect_timeout_secs),
            ("notify_timeout_secs", self.sensor.notify_timeout_secs),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigError::Validation(format!(
                "sensor.{name} must be non-zero"
            )));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:sensor_data.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hygrologd=info,hygrolog=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            poll_interval_minutes: DEFAULT_POLL_MINUTES,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Malformed sensor address.
    #[error("invalid sensor configuration")]
    Sensor(#[from] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
