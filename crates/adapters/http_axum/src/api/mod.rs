//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod readings;

use axum::Router;
use axum::routing::get;

use hygrolog_app::ports::ReadingRepository;

use crate::state::AppState;

/// Build the reading API sub-router.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: ReadingRepository + 'static,
{
    Router::new()
        .route("/history", get(readings::history::<R>))
        .route("/latest", get(readings::latest::<R>))
}
