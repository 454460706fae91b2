//! Ambient invocation metadata.
//!
//! The [`Invocation`] carries what the host runtime knows about the current
//! call: its request id, its deadline, and a cancellation signal. The pipeline
//! never enforces the deadline itself; handlers consult it.

use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline carrier for one invocation.
///
/// # Example
///
/// ```
/// use rack_core::Invocation;
/// use std::time::{Duration, SystemTime};
///
/// let inv = Invocation::new()
///     .with_request_id("c6af9ac6-7b61-11e6-9a41-93e8deadbeef")
///     .with_deadline(SystemTime::now() + Duration::from_secs(3));
///
/// assert!(inv.remaining().is_some());
/// assert!(!inv.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    request_id: Option<String>,
    deadline: Option<SystemTime>,
    cancellation: CancellationToken,
}

impl Invocation {
    /// Creates a carrier with no request id, no deadline, and a fresh token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime-assigned request id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Sets the invocation deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: SystemTime) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Uses an existing cancellation token, e.g. a child of a runtime-wide one.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Returns the runtime-assigned request id, if known.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the deadline, if known.
    #[must_use]
    pub const fn deadline(&self) -> Option<SystemTime> {
        self.deadline
    }

    /// Returns the time left before the deadline.
    ///
    /// `Some(Duration::ZERO)` once the deadline has passed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|deadline| {
            deadline
                .duration_since(SystemTime::now())
                .unwrap_or(Duration::ZERO)
        })
    }

    /// Returns the cancellation token.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Returns `true` once the invocation has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolves when the invocation is cancelled.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }
}
