//! One collection cycle against the thermometer.
//!
//! ```text
//! scanning → connecting → subscribing → awaiting → decoding
//!                              └──────── teardown ────────┘
//! ```
//!
//! Every exit path yields exactly one [`CollectionOutcome`]. Once the
//! subscription succeeded, teardown (unsubscribe then disconnect) runs
//! exactly once, whatever happens afterwards. A discovered link is held by a
//! `LinkGuard`, so a cycle that unwinds or is dropped midway still
//! disconnects.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use hygrolog_domain::outcome::CollectionOutcome;
use hygrolog_domain::reading::SensorReading;
use hygrolog_domain::time;
use tokio::sync::oneshot;

use crate::config::SensorConfig;
use crate::error::DecodeError;
use crate::parser;
use crate::transport::{Central, Link, NotificationSlot};

/// Share of the discover timeout kept back from the scan itself, for adapter
/// setup and stopping the scan.
const DISCOVERY_GRACE: Duration = Duration::from_secs(2);

/// Upper bound for each teardown step.
const TEARDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A single discover→connect→subscribe→await→teardown run.
///
/// Holds nothing across runs; build a new one per cycle.
pub struct BleSensorSession<'a, C> {
    central: &'a C,
    config: &'a SensorConfig,
}

impl<'a, C: Central> BleSensorSession<'a, C> {
    pub fn new(central: &'a C, config: &'a SensorConfig) -> Self {
        Self { central, config }
    }

    pub async fn run(&self) -> CollectionOutcome {
        let address = self.config.address.as_str();

        let link = match self.scan().await {
            Ok(Some(link)) => LinkGuard::new(link, address),
            Ok(None) => {
                tracing::warn!(
                    %address,
                    timeout_secs = self.config.discover_timeout_secs,
                    "device not found"
                );
                return CollectionOutcome::DeviceNotFound;
            }
            Err(outcome) => return outcome,
        };

        if let Err(reason) = self.connect(&link).await {
            tracing::warn!(%address, %reason, "failed to connect");
            link.release().await;
            return CollectionOutcome::ConnectFailed;
        }
        tracing::debug!(%address, "connected");

        let (slot, receiver) = NotificationSlot::channel();
        if let Err(err) = link.subscribe(self.config.characteristic, slot).await {
            let detail = err.detail();
            tracing::error!(%address, error = %detail, "failed to subscribe to notifications");
            link.release().await;
            return CollectionOutcome::TransportError(detail);
        }
        tracing::debug!(%address, characteristic = %self.config.characteristic, "subscribed");

        let outcome = self.await_reading(receiver).await;
        self.teardown(link).await;
        outcome
    }

    /// `Ok(None)` when the device was not seen in time.
    ///
    /// The whole stage, adapter setup included, is bounded by the discover
    /// timeout.
    async fn scan(&self) -> Result<Option<C::Link>, CollectionOutcome> {
        let address = self.config.address.as_str();
        let deadline = self.config.discover_timeout();
        tracing::debug!(%address, "scanning");

        match tokio::time::timeout(
            deadline,
            self.central.discover(address, scan_window(deadline)),
        )
        .await
        {
            Ok(Ok(link)) => Ok(link),
            Ok(Err(err)) => {
                let detail = err.detail();
                tracing::error!(%address, error = %detail, "BLE discovery failed");
                Err(CollectionOutcome::TransportError(detail))
            }
            Err(_) => Ok(None),
        }
    }

    async fn connect(&self, link: &C::Link) -> Result<(), String> {
        match tokio::time::timeout(self.config.connect_timeout(), link.connect()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(err.detail()),
            Err(_) => {
                return Err(format!(
                    "no connection after {}s",
                    self.config.connect_timeout_secs
                ));
            }
        }
        match link.is_connected().await {
            Ok(true) => Ok(()),
            Ok(false) => Err("peripheral reports not connected".to_owned()),
            Err(err) => Err(err.detail()),
        }
    }

    async fn await_reading(&self, receiver: oneshot::Receiver<Vec<u8>>) -> CollectionOutcome {
        let address = self.config.address.as_str();

        let payload = match tokio::time::timeout(self.config.notify_timeout(), receiver).await {
            Ok(Ok(payload)) => payload,
            Ok(Err(_)) => {
                tracing::error!(%address, "notification stream closed before a value arrived");
                return CollectionOutcome::TransportError(
                    "notification stream closed".to_owned(),
                );
            }
            Err(_) => {
                tracing::warn!(
                    %address,
                    timeout_secs = self.config.notify_timeout_secs,
                    "no notification received"
                );
                return CollectionOutcome::NotificationTimeout;
            }
        };

        match parser::decode(&payload) {
            Ok((temperature, humidity)) => {
                tracing::debug!(%address, temperature, humidity, "decoded notification");
                CollectionOutcome::Success(SensorReading::new(temperature, humidity, time::now()))
            }
            Err(DecodeError::MalformedPayload { length }) => {
                tracing::warn!(
                    %address,
                    length,
                    payload = %parser::to_hex(&payload),
                    "unexpected notification payload"
                );
                CollectionOutcome::MalformedPayload { length }
            }
        }
    }

    async fn teardown(&self, link: LinkGuard<C::Link>) {
        let address = self.config.address.as_str();
        match tokio::time::timeout(
            TEARDOWN_TIMEOUT,
            link.unsubscribe(self.config.characteristic),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(%address, error = %err.detail(), "failed to unsubscribe");
            }
            Err(_) => tracing::warn!(%address, "unsubscribe timed out"),
        }
        link.release().await;
    }
}

/// How long the transport may scan within a discovery `deadline`.
fn scan_window(deadline: Duration) -> Duration {
    deadline.saturating_sub(DISCOVERY_GRACE).max(deadline / 2)
}

/// Owns a discovered link until it is explicitly released.
///
/// Dropping an unreleased guard (the cycle panicked or was cancelled)
/// disconnects the link on a background task.
struct LinkGuard<L: Link + 'static> {
    link: Arc<L>,
    address: String,
    armed: bool,
}

impl<L: Link + 'static> LinkGuard<L> {
    fn new(link: L, address: &str) -> Self {
        Self {
            link: Arc::new(link),
            address: address.to_owned(),
            armed: true,
        }
    }

    async fn release(mut self) {
        self.armed = false;
        disconnect(self.link.as_ref(), &self.address).await;
    }
}

impl<L: Link + 'static> Deref for LinkGuard<L> {
    type Target = L;

    fn deref(&self) -> &L {
        &self.link
    }
}

impl<L: Link + 'static> Drop for LinkGuard<L> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let address = std::mem::take(&mut self.address);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(
                    %address,
                    "collection cycle aborted, disconnecting in the background"
                );
                let link = Arc::clone(&self.link);
                handle.spawn(async move {
                    disconnect(link.as_ref(), &address).await;
                });
            }
            Err(_) => {
                tracing::error!(
                    %address,
                    "collection cycle aborted outside a runtime, link left open"
                );
            }
        }
    }
}

async fn disconnect<L: Link>(link: &L, address: &str) {
    match tokio::time::timeout(TEARDOWN_TIMEOUT, link.disconnect()).await {
        Ok(Ok(())) => tracing::debug!(%address, "disconnected"),
        Ok(Err(err)) => {
            tracing::warn!(%address, error = %err.detail(), "failed to disconnect");
        }
        Err(_) => tracing::warn!(%address, "disconnect timed out"),
    }
}
