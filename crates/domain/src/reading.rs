//! Sensor reading — one decoded temperature/humidity sample.

use crate::time::Timestamp;

/// A single temperature/humidity sample taken from the sensor.
///
/// Readings are immutable values: created once when a notification has been
/// decoded, handed to storage, and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Temperature in degrees Celsius, two decimal places.
    pub temperature: f64,
    /// Relative humidity in whole percent.
    pub humidity: i32,
    /// When the reading was taken (local wall-clock time).
    pub observed_at: Timestamp,
}

impl SensorReading {
    #[must_use]
    pub fn new(temperature: f64, humidity: i32, observed_at: Timestamp) -> Self {
        Self {
            temperature,
            humidity,
            observed_at,
        }
    }
}
