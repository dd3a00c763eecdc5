//! BLE adapter error types.
//!
//! None of these ever leave the adapter: the session turns every one of
//! them into a [`CollectionOutcome`](hygrolog_domain::outcome::CollectionOutcome).

use std::fmt::Write as _;

/// Errors raised by the BLE transport.
#[derive(Debug, thiserror::Error)]
pub enum BleError {
    /// No BLE adapter found on the host.
    #[error("no BLE adapter available")]
    NotAvailable,

    /// Any failure reported by the BLE stack.
    #[error("BLE transport error")]
    Transport(#[from] btleplug::Error),

    /// The connected peripheral does not expose the expected characteristic.
    #[error("characteristic {uuid} not found")]
    CharacteristicNotFound {
        /// UUID that was looked up.
        uuid: uuid::Uuid,
    },
}

impl BleError {
    /// Flatten the error and its sources into a single line for logs and
    /// [`CollectionOutcome::TransportError`](hygrolog_domain::outcome::CollectionOutcome::TransportError).
    #[must_use]
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            let _ = write!(out, ": {err}");
            source = err.source();
        }
        out
    }
}

/// Why a notification payload could not be decoded.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload is not exactly 4 bytes long.
    #[error("payload must be 4 bytes, got {length}")]
    MalformedPayload {
        /// Actual byte count.
        length: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_not_available_error() {
        let err = BleError::NotAvailable;
        assert_eq!(err.to_string(), "no BLE adapter available");
    }

    #[test]
    fn should_display_transport_error() {
        let err = BleError::Transport(btleplug::Error::DeviceNotFound);
        assert_eq!(err.to_string(), "BLE transport error");
    }

    #[test]
    fn should_include_source_in_detail() {
        let err = BleError::Transport(btleplug::Error::DeviceNotFound);
        let detail = err.detail();
        assert!(detail.starts_with("BLE transport error: "));
        assert!(detail.len() > "BLE transport error: ".len());
    }

    #[test]
    fn should_display_characteristic_not_found() {
        let uuid = uuid::Uuid::from_u128(0x0000_2a6e_0000_1000_8000_0080_5f9b_34fb);
        let err = BleError::CharacteristicNotFound { uuid };
        assert_eq!(
            err.detail(),
            "characteristic 00002a6e-0000-1000-8000-00805f9b34fb not found"
        );
    }

    #[test]
    fn should_display_malformed_payload() {
        let err = DecodeError::MalformedPayload { length: 3 };
        assert_eq!(err.to_string(), "payload must be 4 bytes, got 3");
    }
}
