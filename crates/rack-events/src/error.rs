//! Event processing errors.

use thiserror::Error;

/// Errors raised while resolving, decoding or encoding a wire event.
///
/// Every variant is infrastructure-level: the pipeline aborts the invocation
/// without running the handler (or without returning a response, for
/// [`EventError::Encode`]).
#[derive(Debug, Error)]
pub enum EventError {
    /// No processor claims the payload.
    #[error("unsupported event type")]
    UnsupportedEventType,

    /// The payload is not valid JSON for the resolved format.
    #[error("failed to decode {format} event: {source}")]
    Decode {
        /// Name of the processor that attempted the decode.
        format: &'static str,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The payload parsed but carries a value the canonical model rejects.
    #[error("invalid {format} event: {reason}")]
    InvalidPayload {
        /// Name of the processor that attempted the decode.
        format: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// The response could not be serialized into the wire format.
    #[error("failed to encode {format} response: {source}")]
    Encode {
        /// Name of the processor that attempted the encode.
        format: &'static str,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl EventError {
    /// Creates a decode error for `format`.
    pub fn decode(format: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { format, source }
    }

    /// Creates an invalid-payload error for `format`.
    pub fn invalid(format: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            format,
            reason: reason.into(),
        }
    }

    /// Creates an encode error for `format`.
    pub fn encode(format: &'static str, source: serde_json::Error) -> Self {
        Self::Encode { format, source }
    }

    /// Returns the pipeline stage the error belongs to.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::UnsupportedEventType => "resolve",
            Self::Decode { .. } | Self::InvalidPayload { .. } => "decode",
            Self::Encode { .. } => "encode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            EventError::UnsupportedEventType.to_string(),
            "unsupported event type"
        );

        let err = EventError::invalid("alb", "bad header name");
        assert_eq!(err.to_string(), "invalid alb event: bad header name");
    }

    #[test]
    fn test_stage() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(EventError::UnsupportedEventType.stage(), "resolve");
        assert_eq!(EventError::decode("alb", parse).stage(), "decode");
        assert_eq!(EventError::invalid("alb", "x").stage(), "decode");
    }
}
