//! Collection outcome — the single result of one BLE collection cycle.

use std::fmt;

use crate::reading::SensorReading;

/// Result of one discover → connect → subscribe → await → teardown cycle.
///
/// Every cycle produces exactly one outcome. Only [`Success`](Self::Success)
/// carries a reading; all other variants describe why the cycle was skipped.
/// Outcomes are never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionOutcome {
    /// A notification was received and decoded.
    Success(SensorReading),
    /// The device did not show up within the discovery timeout.
    DeviceNotFound,
    /// The transport-level connection could not be established.
    ConnectFailed,
    /// No notification arrived within the notification timeout.
    NotificationTimeout,
    /// A notification arrived but had the wrong length.
    MalformedPayload {
        /// Number of bytes actually received.
        length: usize,
    },
    /// Any other BLE stack failure (adapter missing, subscription refused, …).
    TransportError(String),
}

impl CollectionOutcome {
    /// Stable label used as a structured log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::DeviceNotFound => "device_not_found",
            Self::ConnectFailed => "connect_failed",
            Self::NotificationTimeout => "notification_timeout",
            Self::MalformedPayload { .. } => "malformed_payload",
            Self::TransportError(_) => "transport_error",
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Consume the outcome, returning the reading on success.
    #[must_use]
    pub fn into_reading(self) -> Option<SensorReading> {
        match self {
            Self::Success(reading) => Some(reading),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(reading) => write!(
                f,
                "reading T={:.2}°C H={}%",
                reading.temperature, reading.humidity
            ),
            Self::DeviceNotFound => f.write_str("device not found"),
            Self::ConnectFailed => f.write_str("connection failed"),
            Self::NotificationTimeout => f.write_str("timed out waiting for notification"),
            Self::MalformedPayload { length } => {
                write!(f, "malformed payload of {length} bytes")
            }
            Self::TransportError(detail) => write!(f, "transport error: {detail}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_label_every_variant() {
        let reading = SensorReading::new(21.35, 47, now());
        let labels = [
            CollectionOutcome::Success(reading).kind(),
            CollectionOutcome::DeviceNotFound.kind(),
            CollectionOutcome::ConnectFailed.kind(),
            CollectionOutcome::NotificationTimeout.kind(),
            CollectionOutcome::MalformedPayload { length: 3 }.kind(),
            CollectionOutcome::TransportError("boom".to_owned()).kind(),
        ];
        assert_eq!(
            labels,
            [
                "success",
                "device_not_found",
                "connect_failed",
                "notification_timeout",
                "malformed_payload",
                "transport_error",
            ]
        );
    }

    #[test]
    fn should_only_yield_reading_on_success() {
        let reading = SensorReading::new(20.55, 0, now());
        assert_eq!(
            CollectionOutcome::Success(reading.clone()).into_reading(),
            Some(reading)
        );
        assert_eq!(CollectionOutcome::NotificationTimeout.into_reading(), None);
        assert!(!CollectionOutcome::ConnectFailed.is_success());
    }

    #[test]
    fn should_display_malformed_payload_length() {
        let outcome = CollectionOutcome::MalformedPayload { length: 7 };
        assert_eq!(outcome.to_string(), "malformed payload of 7 bytes");
    }
}
