//! The canonical response.

use http::{HeaderMap, StatusCode};

/// The canonical response written by handlers and internal fallbacks.
///
/// `status` starts out as `None`, the "not yet written" state, which is
/// distinct from every valid status code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Status code, or `None` if nothing has been written yet.
    pub status: Option<StatusCode>,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: String,
}

impl Response {
    /// Creates an unwritten response with no headers and no body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once a status has been written.
    #[must_use]
    pub const fn is_written(&self) -> bool {
        self.status.is_some()
    }

    /// Returns the numeric status, `0` while unwritten.
    #[must_use]
    pub fn status_u16(&self) -> u16 {
        self.status.map_or(0, |s| s.as_u16())
    }
}
