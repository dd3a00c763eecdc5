//! Seams between the collection session and the BLE stack.
//!
//! [`Central`] finds a device, [`Link`] drives one connection to it. The
//! btleplug-backed implementation lives in [`crate::platform`]; tests swap in
//! scripted fakes.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::error::BleError;

/// Something that can look up a peripheral by hardware address.
pub trait Central: Send + Sync {
    type Link: Link + 'static;

    /// Look for `address` (case-insensitive), giving up after `timeout`.
    ///
    /// Returns `Ok(None)` when the device was not seen in time.
    fn discover(
        &self,
        address: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Option<Self::Link>, BleError>> + Send;
}

/// A single peripheral, connected or not.
pub trait Link: Send + Sync {
    fn connect(&self) -> impl Future<Output = Result<(), BleError>> + Send;

    fn is_connected(&self) -> impl Future<Output = Result<bool, BleError>> + Send;

    /// Discover services, then start forwarding notifications from
    /// `characteristic` into `slot`.
    fn subscribe(
        &self,
        characteristic: uuid::Uuid,
        slot: NotificationSlot,
    ) -> impl Future<Output = Result<(), BleError>> + Send;

    fn unsubscribe(
        &self,
        characteristic: uuid::Uuid,
    ) -> impl Future<Output = Result<(), BleError>> + Send;

    fn disconnect(&self) -> impl Future<Output = Result<(), BleError>> + Send;
}

/// Write-once hand-off between a notification callback and the session.
///
/// The first [`offer`](Self::offer) wins; every later one is dropped. When
/// every clone is dropped without an offer the receiver sees a closed
/// channel.
#[derive(Clone)]
pub struct NotificationSlot {
    sender: Arc<Mutex<Option<oneshot::Sender<Vec<u8>>>>>,
}

impl NotificationSlot {
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<Vec<u8>>) {
        let (tx, rx) = oneshot::channel();
        let slot = Self {
            sender: Arc::new(Mutex::new(Some(tx))),
        };
        (slot, rx)
    }

    /// Deliver `value` if nothing was delivered before.
    ///
    /// Returns `true` when this call filled the slot.
    pub fn offer(&self, value: &[u8]) -> bool {
        let sender = self
            .sender
            .lock()
            .ok()
            .and_then(|mut sender| sender.take());
        match sender {
            Some(tx) => tx.send(value.to_vec()).is_ok(),
            None => {
                tracing::trace!(length = value.len(), "ignoring extra notification");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_deliver_first_offer_only() {
        let (slot, rx) = NotificationSlot::channel();

        assert!(slot.offer(&[1, 2, 3, 4]));
        assert!(!slot.offer(&[5, 6, 7, 8]));

        assert_eq!(rx.await.unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn should_share_slot_between_clones() {
        let (slot, rx) = NotificationSlot::channel();
        let other = slot.clone();

        assert!(other.offer(&[9]));
        assert!(!slot.offer(&[10]));

        assert_eq!(rx.await.unwrap(), vec![9]);
    }

    #[tokio::test]
    async fn should_close_receiver_when_all_clones_dropped() {
        let (slot, rx) = NotificationSlot::channel();
        let other = slot.clone();
        drop(slot);
        drop(other);

        assert!(rx.await.is_err());
    }

    #[test]
    fn should_report_failed_offer_when_receiver_gone() {
        let (slot, rx) = NotificationSlot::channel();
        drop(rx);

        assert!(!slot.offer(&[1]));
    }
}
