//! Notification payload decoder for the LYWSD03MMC data characteristic.
//!
//! Pure functions operating on raw `&[u8]` slices, no BLE dependency needed.
//!
//! | Offset | Field | Type |
//! |--------|-------|------|
//! | 0–1 | Temperature | i16 LE, x0.01 C |
//! | 2–3 | Humidity | i16 LE, x0.01 % |

use std::fmt::Write as _;

use hygrolog_domain::error::ValidationError;

use crate::error::DecodeError;

/// Temperature/humidity characteristic exposed by stock LYWSD03MMC firmware.
pub const DATA_CHAR: uuid::Uuid = uuid::Uuid::from_u128(0xEBE0_CCC1_7A0A_4B0C_8A1A_6FF2_997D_A3A6);

/// Exact size of a valid notification payload.
pub const PAYLOAD_LEN: usize = 4;

/// Decode a notification into `(temperature °C, humidity %)`.
///
/// Temperature keeps two decimals. Humidity is rounded to the nearest
/// integer with ties going to the even neighbour, and is not clamped.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedPayload`] when `data` is not exactly
/// [`PAYLOAD_LEN`] bytes.
pub fn decode(data: &[u8]) -> Result<(f64, i32), DecodeError> {
    let Ok([t0, t1, h0, h1]) = <[u8; PAYLOAD_LEN]>::try_from(data) else {
        return Err(DecodeError::MalformedPayload { length: data.len() });
    };

    let temperature = f64::from(i16::from_le_bytes([t0, t1])) / 100.0;
    let humidity = f64::from(i16::from_le_bytes([h0, h1])) / 100.0;

    // |humidity| <= 327.68, always fits
    #[allow(clippy::cast_possible_truncation)]
    let humidity = humidity.round_ties_even() as i32;

    Ok((temperature, humidity))
}

/// Validate a `XX:XX:XX:XX:XX:XX` hardware address and normalise it to
/// upper case.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAddress`] for anything that is not six
/// colon-separated hex octets.
pub fn normalize_address(value: &str) -> Result<String, ValidationError> {
    let mut mac = [0u8; 6];
    let mut octets = value.trim().split(':');
    for slot in &mut mac {
        let octet = octets
            .next()
            .filter(|octet| octet.len() == 2 && octet.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|octet| u8::from_str_radix(octet, 16).ok())
            .ok_or_else(|| ValidationError::InvalidAddress(value.to_string()))?;
        *slot = octet;
    }
    if octets.next().is_some() {
        return Err(ValidationError::InvalidAddress(value.to_string()));
    }
    Ok(format_mac(mac))
}

/// Format a 6-byte MAC as `"AA:BB:CC:DD:EE:FF"`.
#[must_use]
pub fn format_mac(mac: [u8; 6]) -> String {
    format!(
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
}

/// Lowercase hex dump used when logging rejected payloads.
#[must_use]
pub fn to_hex(data: &[u8]) -> String {
    data.iter()
        .fold(String::with_capacity(data.len() * 2), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}
