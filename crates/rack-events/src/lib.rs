//! # Rack Events
//!
//! Wire event processors for Lambda HTTP integrations.
//!
//! - [`Processor`] - Detect, decode and encode one wire format
//! - [`ApiGatewayProxyProcessor`] - API Gateway REST proxy (payload 1.0)
//! - [`ApiGatewayV2Processor`] - API Gateway HTTP API (payload 2.0)
//! - [`AlbTargetGroupProcessor`] - Application Load Balancer target groups
//! - [`Resolver`] - Pick the processor for a raw payload
//!
//! Wire events are the [`aws_lambda_events`] types; the decoded event is
//! available to handlers through `Request::event`.
//!
//! ## Example
//!
//! ```rust
//! use rack_events::{default_resolver, fixtures, Resolver};
//!
//! let processor = default_resolver()
//!     .resolve(fixtures::API_GATEWAY_V2.as_bytes())
//!     .unwrap();
//! assert_eq!(processor.name(), "api_gateway_v2");
//!
//! let request = processor
//!     .decode_request(fixtures::API_GATEWAY_V2.as_bytes())
//!     .unwrap();
//! assert_eq!(request.query["q2"], vec!["v2", "v3"]);
//! ```

#![doc(html_root_url = "https://docs.rs/rack-events/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod alb;
mod apigw;
mod apigw_v2;
mod error;
pub mod fixtures;
mod probe;
mod processor;
mod resolver;
mod wire;

pub use alb::AlbTargetGroupProcessor;
pub use apigw::ApiGatewayProxyProcessor;
pub use apigw_v2::ApiGatewayV2Processor;
pub use aws_lambda_events::alb::AlbTargetGroupRequest;
pub use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayV2httpRequest};
pub use error::EventError;
pub use processor::{EventFormat, Processor, SharedProcessor, UnknownEventFormat};
pub use resolver::{
    default_resolver, ConditionalResolver, Resolver, SharedResolver, StaticResolver,
};
