//! Sensor connection configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::parser::DATA_CHAR;

/// Where to find the sensor and how long each stage of a cycle may take.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Hardware address of the thermometer (e.g. `"A4:C1:38:E6:AD:AD"`).
    pub address: String,
    /// Characteristic that pushes the temperature/humidity payload.
    pub characteristic: uuid::Uuid,
    /// Hard deadline for the whole discovery stage, adapter setup and scan
    /// included, in seconds.
    pub discover_timeout_secs: u16,
    /// How long the connection attempt may take, in seconds.
    pub connect_timeout_secs: u16,
    /// How long to wait for a notification once subscribed, in seconds.
    pub notify_timeout_secs: u16,
}

impl SensorConfig {
    #[must_use]
    pub fn discover_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.discover_timeout_secs))
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_secs))
    }

    #[must_use]
    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.notify_timeout_secs))
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            characteristic: DATA_CHAR,
            discover_timeout_secs: 10,
            connect_timeout_secs: 20,
            notify_timeout_secs: 10,
        }
    }
}
