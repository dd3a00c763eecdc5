//! Time and timestamp helpers.
//!
//! Readings are stamped with the local wall-clock time of the collector host
//! and stored as text in a fixed, lexicographically sortable format.

use chrono::{Local, NaiveDateTime};

/// Local wall-clock timestamp with microsecond precision.
pub type Timestamp = NaiveDateTime;

/// Storage format: `YYYY-MM-DD HH:MM:SS.ffffff`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Return the current local time.
#[must_use]
pub fn now() -> Timestamp {
    Local::now().naive_local()
}

/// Render a timestamp in [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn format(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp written by [`format`].
///
/// # Errors
///
/// Returns [`chrono::ParseError`] when `value` does not match
/// [`TIMESTAMP_FORMAT`].
pub fn parse(value: &str) -> Result<Timestamp, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}
