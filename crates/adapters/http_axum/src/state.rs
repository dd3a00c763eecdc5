//! Shared application state for axum handlers.

use std::sync::Arc;

use hygrolog_app::ports::ReadingRepository;
use hygrolog_app::services::reading_service::ReadingService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository type to avoid dynamic dispatch. `Clone` is
/// implemented manually so the repository itself does not need to be `Clone`.
pub struct AppState<R> {
    /// History and latest-reading queries.
    pub reading_service: Arc<ReadingService<R>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            reading_service: Arc::clone(&self.reading_service),
        }
    }
}

impl<R: ReadingRepository + 'static> AppState<R> {
    /// Create a new application state from a service instance.
    pub fn new(reading_service: ReadingService<R>) -> Self {
        Self {
            reading_service: Arc::new(reading_service),
        }
    }
}
