//! # hygrolog-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SensorSource` — run one collection cycle against the sensor
//!   - `ReadingSink` — ensure the schema exists and append readings
//!   - `ReadingRepository` — list and fetch stored readings
//! - Define **driving/inbound services**:
//!   - `CollectionScheduler` — periodic collection loop with cancellation
//!   - `ReadingService` — read-only queries over the stored series
//! - Orchestrate domain objects without knowing *how* BLE or persistence work
//!
//! ## Dependency rule
//! Depends on `hygrolog-domain` only (plus `tokio` for timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
