//! Sensor port — one bounded collection cycle against a physical sensor.

use std::future::Future;

use hygrolog_domain::outcome::CollectionOutcome;

/// Something that can take a single reading from a sensor.
///
/// Implementations must convert every failure into a [`CollectionOutcome`]
/// variant: a call always resolves to exactly one outcome and never leaves
/// connections or subscriptions open once it returns.
pub trait SensorSource: Send + Sync {
    /// Identifier of the device this source reads from, used as log context.
    fn device(&self) -> &str;

    /// Run one full collection cycle.
    fn collect(&self) -> impl Future<Output = CollectionOutcome> + Send;
}
