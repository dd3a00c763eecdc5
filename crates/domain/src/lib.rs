//! # hygrolog-domain
//!
//! Pure domain model for the hygrolog temperature/humidity collector.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Readings** (one decoded temperature/humidity sample)
//! - Define **Collection outcomes** (the single result of one BLE cycle)
//! - Define **History queries** (sort order and limit for read access)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod outcome;
pub mod query;
pub mod reading;
