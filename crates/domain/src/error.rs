//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HygroError`]
//! via `#[from]` (or an explicit `From` impl) when crossing a port boundary.

/// Base error type returned by port traits and application services.
#[derive(Debug, thiserror::Error)]
pub enum HygroError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// An opaque failure from a storage adapter. The inner error is only
    /// meant for logs, never for end users.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl HygroError {
    /// The error followed by every source in its chain, on one line.
    #[must_use]
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

/// Invalid user input or configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid 'order' parameter {0:?}, use 'asc' or 'desc'")]
    InvalidOrder(String),

    #[error("invalid device address {0:?}, expected XX:XX:XX:XX:XX:XX")]
    InvalidAddress(String),
}

/// A requested record does not exist.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wrap_validation_error() {
        let err: HygroError = ValidationError::InvalidOrder("up".to_owned()).into();
        assert!(matches!(err, HygroError::Validation(_)));
        assert_eq!(err.to_string(), "validation error");
    }

    #[test]
    fn should_display_invalid_order() {
        let err = ValidationError::InvalidOrder("sideways".to_owned());
        assert_eq!(
            err.to_string(),
            "invalid 'order' parameter \"sideways\", use 'asc' or 'desc'"
        );
    }

    #[test]
    fn should_display_not_found() {
        let err = NotFoundError { entity: "Reading" };
        assert_eq!(err.to_string(), "Reading not found");
    }

    #[test]
    fn should_keep_storage_source() {
        let io = std::io::Error::other("disk full");
        let err = HygroError::Storage(Box::new(io));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "disk full");
    }

    #[test]
    fn should_flatten_storage_source_chain() {
        let io = std::io::Error::other("disk full");
        let err = HygroError::Storage(Box::new(io));
        assert_eq!(err.detail(), "storage error: disk full");
    }

    #[test]
    fn should_include_wrapped_error_in_detail() {
        let err: HygroError = NotFoundError { entity: "Reading" }.into();
        assert_eq!(err.detail(), "not found: Reading not found");
    }
}
