//! Storage port — persistence of sensor readings.
//!
//! The collector only ever appends ([`ReadingSink`]); the query side only
//! ever reads ([`ReadingRepository`]). A single adapter usually implements
//! both over the same store.

use std::future::Future;

use hygrolog_domain::error::HygroError;
use hygrolog_domain::query::HistoryQuery;
use hygrolog_domain::reading::SensorReading;

/// Append-only destination for collected readings.
pub trait ReadingSink: Send + Sync {
    /// Create the readings table (and its indexes) if absent.
    ///
    /// Must be idempotent: existing rows and the table definition are left
    /// untouched when the schema already exists.
    fn ensure_schema(&self) -> impl Future<Output = Result<(), HygroError>> + Send;

    /// Persist a single reading.
    fn record(
        &self,
        reading: &SensorReading,
    ) -> impl Future<Output = Result<(), HygroError>> + Send;
}

/// Read access to the stored series.
pub trait ReadingRepository: Send + Sync {
    /// List readings sorted by timestamp according to `query`.
    fn list(
        &self,
        query: HistoryQuery,
    ) -> impl Future<Output = Result<Vec<SensorReading>, HygroError>> + Send;

    /// Most recent reading, if any.
    fn latest(&self) -> impl Future<Output = Result<Option<SensorReading>, HygroError>> + Send;
}
