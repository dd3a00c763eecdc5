//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use hygrolog_app::ports::ReadingRepository;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves `/health`, `/history` and `/latest`. Includes a [`TraceLayer`]
/// that logs each HTTP request/response at the `DEBUG` level using the
/// `tracing` ecosystem.
pub fn build<R>(state: AppState<R>) -> Router
where
    R: ReadingRepository + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
