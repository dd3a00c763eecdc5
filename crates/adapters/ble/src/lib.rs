//! # hygrolog-adapter-ble
//!
//! Active BLE adapter: connects to a Xiaomi LYWSD03MMC thermometer running
//! stock firmware, subscribes to its temperature/humidity characteristic and
//! turns the first notification into a reading.
//!
//! ## How it works
//!
//! Each call to [`SensorSource::collect`] runs one
//! [`BleSensorSession`]: discover the device by address, connect, subscribe,
//! wait for a single notification, decode it and tear the connection down.
//! Nothing is kept between cycles.
//!
//! ## Payload
//!
//! | Offset | Field | Type |
//! |--------|-------|------|
//! | 0–1 | Temperature | i16 LE, x0.01 C |
//! | 2–3 | Humidity | i16 LE, x0.01 % |
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `hygrolog-app` and `hygrolog-domain`.

mod config;
mod error;
pub mod parser;
pub mod platform;
pub mod session;
pub mod transport;

pub use config::SensorConfig;
pub use error::{BleError, DecodeError};
pub use platform::BtleplugCentral;
pub use session::BleSensorSession;

use hygrolog_app::ports::SensorSource;
use hygrolog_domain::outcome::CollectionOutcome;

use crate::transport::Central;

/// [`SensorSource`] backed by a BLE central.
pub struct BleSensorSource<C = BtleplugCentral> {
    central: C,
    config: SensorConfig,
}

impl<C: Central> BleSensorSource<C> {
    pub fn new(central: C, config: SensorConfig) -> Self {
        Self { central, config }
    }
}

impl<C: Central> SensorSource for BleSensorSource<C> {
    fn device(&self) -> &str {
        &self.config.address
    }

    async fn collect(&self) -> CollectionOutcome {
        BleSensorSession::new(&self.central, &self.config)
            .run()
            .await
    }
}
