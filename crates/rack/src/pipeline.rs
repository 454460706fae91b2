//! The invocation pipeline.
//!
//! ```text
//! payload → resolve → decode → middleware → handler
//!                                              ↓ Err
//!                                          on_error
//!                                              ↓
//!                      status unset? → on_empty_response (Err → on_error)
//!                                              ↓
//!                                  encode → response payload
//! ```
//!
//! Resolve, decode and encode failures abort the invocation, as does an
//! error handler that returns `Err`. Everything else ends in a response.

use crate::defaults;
use crate::{Config, InvocationError};
use rack_core::{
    boxed, status_code, BindHook, BoxedErrorHandler, BoxedHandler, Context, Handler, Invocation,
};
use rack_events::{EventError, SharedResolver};
use rack_telemetry::logging::fields;
use rack_telemetry::{record_abort, record_invocation, InFlightGuard};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{field, Instrument, Span};

/// A handler bound to its event formats and policies.
///
/// Built once at cold start and shared by every invocation. Cloning is cheap.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use rack::Rack;
/// use rack_core::{Context, HandlerResult, Invocation};
/// use rack_events::fixtures;
///
/// async fn hello(ctx: Context) -> HandlerResult {
///     ctx.string(StatusCode::OK, "hello")
/// }
///
/// # tokio_test::block_on(async {
/// let rack = Rack::new(hello);
/// let out = rack
///     .invoke(Invocation::new(), fixtures::API_GATEWAY_V2.as_bytes())
///     .await
///     .unwrap();
///
/// let out: serde_json::Value = serde_json::from_slice(&out).unwrap();
/// assert_eq!(out["statusCode"], 200);
/// assert_eq!(out["body"], "hello");
/// # });
/// ```
#[derive(Clone)]
pub struct Rack {
    inner: Arc<Inner>,
}

struct Inner {
    resolver: SharedResolver,
    handler: BoxedHandler,
    middleware: Vec<&'static str>,
    on_bind: BindHook,
    on_error: BoxedErrorHandler,
    on_empty_response: BoxedHandler,
}

impl Rack {
    /// Binds `handler` with the default config.
    pub fn new<H: Handler>(handler: H) -> Self {
        Self::with_config(Config::default(), handler)
    }

    /// Binds `handler` with `config`, filling empty slots with defaults.
    pub fn with_config<H: Handler>(config: Config, handler: H) -> Self {
        let resolver = config.resolver_or_default();
        let handler = config.middleware.then(boxed(handler));

        Self {
            inner: Arc::new(Inner {
                resolver,
                handler,
                middleware: config.middleware.names().collect(),
                on_bind: config
                    .on_bind
                    .unwrap_or_else(|| Arc::new(defaults::accept_bound)),
                on_error: config
                    .on_error
                    .unwrap_or_else(|| Arc::new(defaults::error_handler)),
                on_empty_response: config
                    .on_empty_response
                    .unwrap_or_else(|| boxed(defaults::empty_response)),
            }),
        }
    }

    /// Processes one raw event payload and returns the encoded response.
    ///
    /// # Errors
    ///
    /// - [`InvocationError::Event`] when no processor claims the payload, the
    ///   payload does not decode, or the response does not encode
    /// - [`InvocationError::Handler`] when the error handler re-raises
    pub async fn invoke(
        &self,
        invocation: Invocation,
        payload: &[u8],
    ) -> Result<Vec<u8>, InvocationError> {
        let span = tracing::info_span!(
            "invocation",
            request_id = invocation.request_id().unwrap_or_default(),
            format = field::Empty,
        );

        self.process(invocation, payload).instrument(span).await
    }

    async fn process(
        &self,
        invocation: Invocation,
        payload: &[u8],
    ) -> Result<Vec<u8>, InvocationError> {
        let _in_flight = InFlightGuard::new();
        let start = Instant::now();

        let processor = self.inner.resolver.resolve(payload).map_err(abort)?;
        let format = processor.name();
        Span::current().record(fields::FORMAT, format);

        let request = processor.decode_request(payload).map_err(abort)?;
        let ctx = Context::with_bind_hook(invocation, request, Arc::clone(&self.inner.on_bind));

        self.respond(&ctx).await?;

        let response = ctx.snapshot();
        let encoded = processor.encode_response(&response).map_err(abort)?;

        let duration = start.elapsed();
        record_invocation(format, response.status_u16(), duration);
        tracing::debug!(
            status = response.status_u16(),
            duration_ms = duration.as_secs_f64() * 1000.0,
            "invocation completed"
        );

        Ok(encoded)
    }

    /// Runs the handler, then the empty-response policy if nothing was written.
    async fn respond(&self, ctx: &Context) -> Result<(), InvocationError> {
        if let Err(err) = self.inner.handler.call(ctx.clone()).await {
            self.recover(ctx, err).await?;
        }

        let written = ctx.response().is_written();
        if !written {
            if let Err(err) = self.inner.on_empty_response.call(ctx.clone()).await {
                self.recover(ctx, err).await?;
            }
        }

        Ok(())
    }

    async fn recover(&self, ctx: &Context, err: anyhow::Error) -> Result<(), InvocationError> {
        tracing::warn!(
            error = %err,
            status = status_code(&err).as_u16(),
            "handler failed, running error handler"
        );

        self.inner
            .on_error
            .handle(ctx.clone(), err)
            .await
            .map_err(|err| {
                tracing::error!(stage = "handler", error = %err, "invocation aborted");
                record_abort("handler");
                InvocationError::Handler(err)
            })
    }
}

fn abort(err: EventError) -> InvocationError {
    tracing::error!(stage = err.stage(), error = %err, "invocation aborted");
    record_abort(err.stage());
    InvocationError::Event(err)
}

impl fmt::Debug for Rack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rack")
            .field("middleware", &self.inner.middleware)
            .finish_non_exhaustive()
    }
}
