//! # hygrolog-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement [`ReadingSink`](hygrolog_app::ports::ReadingSink) and
//!   [`ReadingRepository`](hygrolog_app::ports::ReadingRepository)
//! - Manage `SQLite` connection pool lifecycle
//! - Create the `sensor_readings` table on startup
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `hygrolog-app` (for port traits) and `hygrolog-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;
pub mod reading_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use reading_repo::SqliteReadingRepository;
