//! Collection scheduler — drives the sensor on a fixed period until cancelled.
//!
//! Each cycle asks the [`SensorSource`] for exactly one
//! [`CollectionOutcome`] and turns it into either a storage write or a
//! logged skip. Nothing that happens inside a cycle (failed collection,
//! storage error, even a panic in the adapter) stops the loop. The only
//! fatal failure is [`prepare`](CollectionScheduler::prepare), which runs
//! before the first cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use hygrolog_domain::error::HygroError;
use hygrolog_domain::outcome::CollectionOutcome;
use hygrolog_domain::reading::SensorReading;
use hygrolog_domain::time;

use crate::ports::{ReadingSink, SensorSource};

/// Default period between two collections.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// What a single cycle ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleReport {
    /// A reading was collected and persisted.
    Stored(SensorReading),
    /// A reading was collected but the write failed.
    StoreFailed,
    /// No reading this cycle; carries the outcome kind.
    Skipped(&'static str),
    /// The collection task panicked.
    Crashed,
}

/// Periodic collector.
///
/// The source is held behind an [`Arc`] because every cycle runs on its own
/// task, which isolates panics raised inside the BLE stack.
pub struct CollectionScheduler<S, K> {
    source: Arc<S>,
    sink: K,
    interval: Duration,
}

impl<S, K> CollectionScheduler<S, K>
where
    S: SensorSource + 'static,
    K: ReadingSink,
{
    /// Create a new scheduler.
    pub fn new(source: Arc<S>, sink: K, interval: Duration) -> Self {
        Self {
            source,
            sink,
            interval,
        }
    }

    /// Make sure the storage schema exists.
    ///
    /// # Errors
    ///
    /// Returns the storage error unchanged; callers should treat it as fatal.
    pub async fn prepare(&self) -> Result<(), HygroError> {
        self.sink.ensure_schema().await?;
        tracing::info!("readings schema ready");
        Ok(())
    }

    /// Prepare storage, then collect until `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns an error only if [`prepare`](Self::prepare) fails, in which
    /// case no cycle is run.
    pub async fn start(&self, cancel: CancellationToken) -> Result<(), HygroError> {
        self.prepare().await?;
        self.run(cancel).await;
        Ok(())
    }

    /// Collection loop.
    ///
    /// Cancellation is observed before each cycle and while sleeping, never
    /// in the middle of a cycle, so an in-flight write always completes.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            device = self.source.device(),
            interval_secs = self.interval.as_secs(),
            "collector started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            self.run_cycle().await;

            tracing::debug!(
                interval_secs = self.interval.as_secs(),
                "waiting until next scheduled collection"
            );
            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("collector stopped");
    }

    /// Run exactly one collection cycle and handle its outcome.
    pub async fn run_cycle(&self) -> CycleReport {
        let device = self.source.device();
        let source = Arc::clone(&self.source);

        let outcome = match tokio::spawn(async move { source.collect().await }).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(
                    severity = "critical",
                    %err,
                    device,
                    "collection cycle aborted unexpectedly"
                );
                return CycleReport::Crashed;
            }
        };

        let kind = outcome.kind();
        match outcome {
            CollectionOutcome::Success(reading) => match self.sink.record(&reading).await {
                Ok(()) => {
                    tracing::info!(
                        temperature = reading.temperature,
                        humidity = reading.humidity,
                        observed_at = %time::format(&reading.observed_at),
                        "saved reading"
                    );
                    CycleReport::Stored(reading)
                }
                Err(err) => {
                    tracing::error!(error = ?err, device, "failed to store reading");
                    CycleReport::StoreFailed
                }
            },
            skipped @ (CollectionOutcome::DeviceNotFound | CollectionOutcome::NotificationTimeout) => {
                tracing::warn!(device, kind, outcome = %skipped, "no reading this cycle");
                CycleReport::Skipped(kind)
            }
            other => {
                tracing::error!(device, kind, outcome = %other, "collection failed");
                CycleReport::Skipped(kind)
            }
        }
    }
}
