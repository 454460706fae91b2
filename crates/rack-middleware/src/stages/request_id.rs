//! Request ID middleware.
//!
//! Gives every invocation a correlation id, stores it in the context scratch
//! store and echoes it on the response.
//!
//! ## Request ID Sources
//!
//! 1. **X-Request-ID header**: only when incoming ids are trusted
//! 2. **Invocation request id**: the id assigned by the Lambda runtime
//! 3. **Generated UUID v7**: when neither is available
//!
//! ## Response Header
//!
//! The header is set before the handler runs, so it survives on responses
//! written by the error handler.

use crate::middleware::{Middleware, Next};
use http::HeaderValue;
use rack_core::{BoxFuture, Context, HandlerResult};
use uuid::Uuid;

/// The header name for request ID propagation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The scratch-store key holding the request id as a `String`.
pub const REQUEST_ID_KEY: &str = "request_id";

/// Middleware that assigns request IDs.
///
/// # Example
///
/// ```
/// use rack_middleware::{stages::RequestIdMiddleware, Chain};
///
/// let chain = Chain::new().with(RequestIdMiddleware::new());
/// assert_eq!(chain.names().next(), Some("request_id"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestIdMiddleware {
    /// Whether to reuse an incoming `X-Request-ID` header.
    trust_incoming: bool,
}

impl RequestIdMiddleware {
    /// Creates a new Request ID middleware that ignores incoming headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a middleware that reuses incoming `X-Request-ID` headers.
    ///
    /// Use this behind gateways that already assign ids.
    #[must_use]
    pub fn trust_incoming() -> Self {
        Self {
            trust_incoming: true,
        }
    }

    fn resolve_request_id(&self, ctx: &Context) -> String {
        let incoming = self
            .trust_incoming
            .then(|| ctx.request().headers.get(REQUEST_ID_HEADER))
            .flatten()
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());

        incoming
            .or_else(|| ctx.invocation().request_id())
            .map_or_else(|| Uuid::now_v7().to_string(), str::to_string)
    }
}

impl Middleware for RequestIdMiddleware {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn process<'a>(&'a self, ctx: Context, next: Next) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let request_id = self.resolve_request_id(&ctx);

            match HeaderValue::from_str(&request_id) {
                Ok(value) => {
                    ctx.response_mut().headers.insert(REQUEST_ID_HEADER, value);
                }
                Err(_) => {
                    tracing::warn!(request_id = %request_id, "request id is not a valid header value");
                }
            }
            ctx.set(REQUEST_ID_KEY, request_id);

            next.run(ctx).await
        })
    }
}

/// Returns the request id stored by [`RequestIdMiddleware`], if any.
pub fn request_id(ctx: &Context) -> Option<String> {
    ctx.get::<String>(REQUEST_ID_KEY).map(|id| id.as_ref().clone())
}
