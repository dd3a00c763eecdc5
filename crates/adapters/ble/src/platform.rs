//! btleplug-backed [`Central`] and [`Link`].

use std::sync::Mutex;
use std::time::Duration;

use btleplug::api::{
    Central as _, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt as _;

use crate::error::BleError;
use crate::transport::{Central, Link, NotificationSlot};

/// Uses the first BLE adapter found on the host.
///
/// A new manager is built for each discovery so an adapter that disappears
/// and comes back is picked up on the next cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct BtleplugCentral;

impl Central for BtleplugCentral {
    type Link = BtleplugLink;

    async fn discover(
        &self,
        address: &str,
        timeout: Duration,
    ) -> Result<Option<BtleplugLink>, BleError> {
        let manager = Manager::new().await?;
        let adapters = manager.adapters().await?;
        let central = adapters.into_iter().next().ok_or(BleError::NotAvailable)?;

        if let Some(peripheral) = find_known(&central, address).await? {
            tracing::debug!(%address, "device already known to the adapter");
            return Ok(Some(BtleplugLink::new(peripheral)));
        }

        let mut events = central.events().await?;
        central.start_scan(ScanFilter::default()).await?;

        let deadline = tokio::time::Instant::now() + timeout;
        let mut found = None;

        while tokio::time::Instant::now() < deadline {
            let remaining = deadline - tokio::time::Instant::now();
            match tokio::time::timeout(remaining, events.next()).await {
                Ok(Some(CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id))) => {
                    let Ok(peripheral) = central.peripheral(&id).await else {
                        continue;
                    };
                    if matches_address(&peripheral, address) {
                        tracing::debug!(%address, "device discovered");
                        found = Some(peripheral);
                        break;
                    }
                }
                Ok(Some(_)) => {}
                Ok(None) | Err(_) => break,
            }
        }

        if let Err(err) = central.stop_scan().await {
            tracing::warn!(%err, "failed to stop BLE scan");
        }

        Ok(found.map(BtleplugLink::new))
    }
}

async fn find_known(central: &Adapter, address: &str) -> Result<Option<Peripheral>, BleError> {
    let peripherals = central.peripherals().await?;
    Ok(peripherals
        .into_iter()
        .find(|peripheral| matches_address(peripheral, address)))
}

fn matches_address(peripheral: &Peripheral, address: &str) -> bool {
    peripheral
        .address()
        .to_string()
        .eq_ignore_ascii_case(address)
}

/// One peripheral plus the task forwarding its notifications.
pub struct BtleplugLink {
    peripheral: Peripheral,
    forwarder: Mutex<Option<JoinHandle<()>>>,
}

impl BtleplugLink {
    fn new(peripheral: Peripheral) -> Self {
        Self {
            peripheral,
            forwarder: Mutex::new(None),
        }
    }

    fn find_characteristic(&self, uuid: uuid::Uuid) -> Result<Characteristic, BleError> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == uuid)
            .ok_or(BleError::CharacteristicNotFound { uuid })
    }

    fn stop_forwarder(&self) {
        let handle = self
            .forwarder
            .lock()
            .ok()
            .and_then(|mut forwarder| forwarder.take());
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl Drop for BtleplugLink {
    fn drop(&mut self) {
        self.stop_forwarder();
    }
}

impl Link for BtleplugLink {
    async fn connect(&self) -> Result<(), BleError> {
        self.peripheral.connect().await?;
        Ok(())
    }

    async fn is_connected(&self) -> Result<bool, BleError> {
        Ok(self.peripheral.is_connected().await?)
    }

    async fn subscribe(
        &self,
        characteristic: uuid::Uuid,
        slot: NotificationSlot,
    ) -> Result<(), BleError> {
        self.peripheral.discover_services().await?;
        let target = self.find_characteristic(characteristic)?;

        // take the stream before subscribing so the first value is not missed
        let mut notifications = self.peripheral.notifications().await?;
        self.peripheral.subscribe(&target).await?;

        let handle = tokio::spawn(async move {
            while let Some(notification) = notifications.next().await {
                if notification.uuid == characteristic {
                    slot.offer(&notification.value);
                }
            }
        });

        match self.forwarder.lock() {
            Ok(mut forwarder) => {
                if let Some(previous) = forwarder.replace(handle) {
                    previous.abort();
                }
            }
            Err(_) => handle.abort(),
        }
        Ok(())
    }

    async fn unsubscribe(&self, characteristic: uuid::Uuid) -> Result<(), BleError> {
        self.stop_forwarder();
        let target = self.find_characteristic(characteristic)?;
        self.peripheral.unsubscribe(&target).await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), BleError> {
        self.stop_forwarder();
        self.peripheral.disconnect().await?;
        Ok(())
    }
}
