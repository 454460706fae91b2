//! Invocation-level errors.

use rack_events::EventError;
use thiserror::Error;

/// An invocation that produced no response.
///
/// Handler errors recovered by the error handler never surface here; they are
/// already part of the encoded response.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The payload could not be resolved or decoded, or the response could
    /// not be encoded.
    #[error(transparent)]
    Event(#[from] EventError),

    /// The error handler re-raised.
    #[error(transparent)]
    Handler(anyhow::Error),
}

impl InvocationError {
    /// Returns the pipeline stage that aborted the invocation.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Event(err) => err.stage(),
            Self::Handler(_) => "handler",
        }
    }
}
