//! Status-carrying errors.
//!
//! This module provides the [`StatusError`] type, the single mechanism by which
//! handler errors are mapped onto a wire status code.
//!
//! Handlers return [`anyhow::Error`], so a `StatusError` may sit anywhere in
//! the cause chain. [`status_code`] walks that chain and returns the first
//! carried status, falling back to `500 Internal Server Error`.

use http::StatusCode;
use std::error::Error as StdError;
use thiserror::Error;

/// A boxed, thread-safe error used as the wrapped cause of a [`StatusError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error carrying an explicit wire status code.
///
/// # Example
///
/// ```
/// use rack_core::StatusError;
/// use http::StatusCode;
///
/// let err = StatusError::new(StatusCode::CONFLICT, "already exists");
/// assert_eq!(err.code(), StatusCode::CONFLICT);
/// assert_eq!(err.to_string(), "already exists");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StatusError {
    code: StatusCode,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl StatusError {
    /// Creates a status error with its own message.
    #[must_use]
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an existing error, taking its message.
    pub fn wrap(code: StatusCode, err: impl Into<BoxError>) -> Self {
        let source = err.into();
        Self {
            code,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Returns the carried status code.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        self.code
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the wrapped error, if any.
    #[must_use]
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Shorthand for a `400 Bad Request` status error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Shorthand for a `404 Not Found` status error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Shorthand for a `500 Internal Server Error` status error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

/// Returns the status code carried by any error in the cause chain.
///
/// Defaults to `500 Internal Server Error` when no link exposes a status.
///
/// Only [`StatusError`] links carry a status. A custom error type maps to a
/// status by being wrapped with [`StatusError::wrap`], or by carrying a
/// `StatusError` as its source.
///
/// # Example
///
/// ```
/// use rack_core::{status_code, StatusError};
/// use http::StatusCode;
///
/// let err = anyhow::Error::new(StatusError::not_found("missing")).context("lookup failed");
/// assert_eq!(status_code(&err), StatusCode::NOT_FOUND);
///
/// let plain = anyhow::anyhow!("boom");
/// assert_eq!(status_code(&plain), StatusCode::INTERNAL_SERVER_ERROR);
/// ```
pub fn status_code(err: &anyhow::Error) -> StatusCode {
    err.chain()
        .find_map(carried_status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Same as [`status_code`], for a plain `std::error::Error`.
pub fn status_code_of(err: &(dyn StdError + 'static)) -> StatusCode {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(code) = carried_status(e) {
            return code;
        }
        current = e.source();
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

fn carried_status(err: &(dyn StdError + 'static)) -> Option<StatusCode> {
    err.downcast_ref::<StatusError>().map(StatusError::code)
}

impl From<serde_json::Error> for StatusError {
    fn from(err: serde_json::Error) -> Self {
        Self::wrap(StatusCode::BAD_REQUEST, err)
    }
}
