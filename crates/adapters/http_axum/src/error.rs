//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use hygrolog_domain::error::HygroError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`HygroError`] to an HTTP response with appropriate status code.
pub struct ApiError(HygroError);

impl From<HygroError> for ApiError {
    fn from(err: HygroError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            HygroError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            HygroError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            HygroError::Storage(_) => {
                tracing::error!(error = %self.0.detail(), "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hygrolog_domain::error::ValidationError;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// sqlx-style wrapper whose message hides the underlying cause.
    #[derive(Debug)]
    struct Database(std::io::Error);

    impl std::fmt::Display for Database {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("database error")
        }
    }

    impl std::error::Error for Database {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn respond_logging(err: HygroError) -> (StatusCode, String) {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer({
                let captured = captured.clone();
                move || captured.clone()
            })
            .finish();

        let response =
            tracing::subscriber::with_default(subscriber, || ApiError::from(err).into_response());

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        (response.status(), logs)
    }

    #[test]
    fn should_log_root_cause_of_storage_failure() {
        let cause = std::io::Error::other("pool timed out while waiting for an open connection");
        let err = HygroError::Storage(Box::new(Database(cause)));

        let (status, logs) = respond_logging(err);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            logs.contains(
                "storage error: database error: pool timed out while waiting for an open connection"
            ),
            "unexpected log output: {logs}"
        );
    }

    #[test]
    fn should_not_log_client_errors() {
        let err: HygroError = ValidationError::InvalidOrder("up".to_owned()).into();

        let (status, logs) = respond_logging(err);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(logs.is_empty(), "unexpected log output: {logs}");
    }
}
