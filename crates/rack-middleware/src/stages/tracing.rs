//! Tracing middleware.
//!
//! Runs the rest of the chain inside a `handler` span and logs completion with
//! the response status and duration.
//!
//! ## Trace Context Propagation
//!
//! When the request carries a [W3C Trace Context](https://www.w3.org/TR/trace-context/)
//! `traceparent` header, its trace id is recorded on the span so logs can be
//! joined with upstream traces.
//!
//! ## Span Fields
//!
//! - `service.name` - Configured service name
//! - `http.method` - Request method
//! - `http.path` - Raw request path
//! - `trace_id` - Propagated trace id, if any
//! - `http.status_code` - Response status, recorded on completion

use crate::middleware::{Middleware, Next};
use rack_core::{BoxFuture, Context, HandlerResult};
use std::time::Instant;
use tracing::{field, Instrument};

/// The W3C Trace Context header for trace propagation.
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Middleware that wraps the handler in a tracing span.
///
/// # Example
///
/// ```
/// use rack_middleware::stages::TracingMiddleware;
///
/// let middleware = TracingMiddleware::new("orders");
/// assert_eq!(middleware.service_name(), "orders");
/// ```
#[derive(Debug, Clone)]
pub struct TracingMiddleware {
    service_name: String,
}

impl TracingMiddleware {
    /// Creates a new Tracing middleware.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Returns the service name recorded on spans.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn extract_trace_context(ctx: &Context) -> Option<TraceContext> {
        let header = ctx.request().headers.get(TRACEPARENT_HEADER)?;
        TraceContext::parse(header.to_str().ok()?)
    }
}

impl Default for TracingMiddleware {
    fn default() -> Self {
        Self::new("unknown")
    }
}

impl Middleware for TracingMiddleware {
    fn name(&self) -> &'static str {
        "tracing"
    }

    fn process<'a>(&'a self, ctx: Context, next: Next) -> BoxFuture<'a, HandlerResult> {
        let span = {
            let request = ctx.request();
            tracing::info_span!(
                "handler",
                service.name = %self.service_name,
                http.method = %request.method,
                http.path = %request.raw_path,
                trace_id = field::Empty,
                http.status_code = field::Empty,
            )
        };
        if let Some(trace) = Self::extract_trace_context(&ctx) {
            span.record("trace_id", trace.trace_id.as_str());
        }

        Box::pin(
            async move {
                let start = Instant::now();
                let result = next.run(ctx.clone()).await;
                let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
                let status = ctx.response().status_u16();

                tracing::Span::current().record("http.status_code", status);
                match &result {
                    Ok(()) => tracing::info!(status, duration_ms, "handler completed"),
                    Err(err) => {
                        tracing::info!(status, duration_ms, error = %err, "handler failed");
                    }
                }
                result
            }
            .instrument(span),
        )
    }
}

/// Parsed trace context from a `traceparent` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// The 128-bit trace ID as a hex string.
    pub trace_id: String,
    /// The parent span ID.
    pub parent_span_id: String,
    /// Trace flags.
    pub flags: TraceFlags,
}

impl TraceContext {
    /// Parses a `traceparent` header value.
    ///
    /// Format: `{version}-{trace-id}-{parent-span-id}-{flags}`
    pub fn parse(value: &str) -> Option<Self> {
        let parts: Vec<&str> = value.split('-').collect();
        let [version, trace_id, parent_span_id, flags] = parts.as_slice() else {
            return None;
        };

        if *version != "00"
            || !is_hex(trace_id, 32)
            || !is_hex(parent_span_id, 16)
            || !is_hex(flags, 2)
        {
            return None;
        }

        Some(Self {
            trace_id: (*trace_id).to_string(),
            parent_span_id: (*parent_span_id).to_string(),
            flags: TraceFlags(u8::from_str_radix(flags, 16).ok()?),
        })
    }
}

fn is_hex(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Trace flags from the W3C Trace Context header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceFlags(u8);

impl TraceFlags {
    /// No flags set.
    pub const NONE: Self = Self(0x00);
    /// The trace is sampled.
    pub const SAMPLED: Self = Self(0x01);

    /// Returns true if the sampled flag is set.
    #[must_use]
    pub const fn is_sampled(self) -> bool {
        self.0 & 0x01 != 0
    }
}
