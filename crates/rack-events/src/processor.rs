//! The [`Processor`] trait and the built-in format selector.
//!
//! A processor is the detect/decode/encode unit for one wire event shape.
//! Processors are stateless and shared across concurrent invocations.

use crate::alb::AlbTargetGroupProcessor;
use crate::apigw::ApiGatewayProxyProcessor;
use crate::apigw_v2::ApiGatewayV2Processor;
use crate::EventError;
use rack_core::{Request, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A shared processor handle.
pub type SharedProcessor = Arc<dyn Processor>;

/// Detects, decodes and encodes one wire event shape.
///
/// # Example
///
/// ```rust,ignore
/// use rack_events::{EventError, Processor};
/// use rack_core::{Request, Response};
///
/// struct Direct;
///
/// impl Processor for Direct {
///     fn name(&self) -> &'static str { "direct" }
///
///     fn can_process(&self, payload: &[u8]) -> bool {
///         payload.starts_with(b"{\"direct\"")
///     }
///
///     fn decode_request(&self, payload: &[u8]) -> Result<Request, EventError> {
///         // ...
///     }
///
///     fn encode_response(&self, response: &Response) -> Result<Vec<u8>, EventError> {
///         // ...
///     }
/// }
/// ```
pub trait Processor: Send + Sync + 'static {
    /// Short, stable name used in logs, metrics and errors.
    fn name(&self) -> &'static str;

    /// Returns `true` if the payload is in this processor's format.
    ///
    /// Must be side-effect free and must not fail.
    fn can_process(&self, payload: &[u8]) -> bool;

    /// Decodes the payload into the canonical request.
    fn decode_request(&self, payload: &[u8]) -> Result<Request, EventError>;

    /// Encodes the canonical response into this format's response shape.
    fn encode_response(&self, response: &Response) -> Result<Vec<u8>, EventError>;
}

impl fmt::Debug for dyn Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Processor").field(&self.name()).finish()
    }
}

/// The built-in wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFormat {
    /// API Gateway REST proxy integration (payload format 1.0).
    ApiGatewayProxy,
    /// API Gateway HTTP API (payload format 2.0).
    ApiGatewayV2,
    /// Application Load Balancer target group.
    Alb,
}

impl EventFormat {
    /// The built-ins in resolution order.
    ///
    /// The discriminating fields are not mutually exclusive, so this order is
    /// part of the contract.
    pub const RESOLUTION_ORDER: [Self; 3] = [Self::ApiGatewayProxy, Self::ApiGatewayV2, Self::Alb];

    /// Returns the processor name for this format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ApiGatewayProxy => ApiGatewayProxyProcessor::NAME,
            Self::ApiGatewayV2 => ApiGatewayV2Processor::NAME,
            Self::Alb => AlbTargetGroupProcessor::NAME,
        }
    }

    /// Returns the processor for this format.
    #[must_use]
    pub fn processor(self) -> SharedProcessor {
        match self {
            Self::ApiGatewayProxy => Arc::new(ApiGatewayProxyProcessor),
            Self::ApiGatewayV2 => Arc::new(ApiGatewayV2Processor),
            Self::Alb => Arc::new(AlbTargetGroupProcessor),
        }
    }
}

impl fmt::Display for EventFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown [`EventFormat`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event format: {0}")]
pub struct UnknownEventFormat(pub String);

impl FromStr for EventFormat {
    type Err = UnknownEventFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::RESOLUTION_ORDER
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEventFormat(s.to_string()))
    }
}

pub(crate) fn encode<T: Serialize>(format: &'static str, value: &T) -> Result<Vec<u8>, EventError> {
    serde_json::to_vec(value).map_err(|e| EventError::encode(format, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_processors() {
        for format in EventFormat::RESOLUTION_ORDER {
            assert_eq!(format.processor().name(), format.name());
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("alb".parse::<EventFormat>(), Ok(EventFormat::Alb));
        assert_eq!(
            " API_GATEWAY_V2 ".parse::<EventFormat>(),
            Ok(EventFormat::ApiGatewayV2)
        );
        assert!("kinesis".parse::<EventFormat>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&EventFormat::ApiGatewayProxy).unwrap();
        assert_eq!(json, r#""api_gateway_proxy""#);

        let parsed: EventFormat = serde_json::from_str(r#""api_gateway_v2""#).unwrap();
        assert_eq!(parsed, EventFormat::ApiGatewayV2);
    }
}
