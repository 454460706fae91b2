//! Built-in middleware stages.
//!
//! Unlike a fixed pipeline, these stages are opt-in: add them to a
//! [`Chain`](crate::Chain) in the order you want them to run.
//!
//! - [`request_id`] - Assign a correlation id and echo it in `x-request-id`
//! - [`tracing`] - Wrap the handler in a span and log completion

pub mod request_id;
pub mod tracing;

pub use self::request_id::{request_id, RequestIdMiddleware, REQUEST_ID_HEADER, REQUEST_ID_KEY};
pub use self::tracing::{TraceContext, TraceFlags, TracingMiddleware, TRACEPARENT_HEADER};
