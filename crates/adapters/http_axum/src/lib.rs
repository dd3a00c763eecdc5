//! # hygrolog-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small **read-only JSON API** over the stored readings
//!   (`/history`, `/latest`) plus a `/health` check
//! - Map query strings into [`HistoryQuery`](hygrolog_domain::query::HistoryQuery)
//!   values (driving adapter)
//! - Shape readings into the string-typed JSON documents clients expect
//!
//! ## Dependency rule
//! Depends on `hygrolog-app` (for port traits and services) and `hygrolog-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
