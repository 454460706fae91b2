//! Pipeline configuration.

use rack_config::{EventSource, RackSettings};
use rack_core::{
    BindHook, BoxedErrorHandler, BoxedHandler, Context, ErrorHandler, Handler, HandlerResult,
};
use rack_events::{default_resolver, EventFormat, Resolver, SharedResolver, StaticResolver};
use rack_middleware::stages::{RequestIdMiddleware, TracingMiddleware};
use rack_middleware::{Chain, Middleware};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Pluggable pieces of a [`Rack`](crate::Rack) pipeline.
///
/// Every slot is optional; empty slots get the defaults:
///
/// | Slot | Default |
/// |------|---------|
/// | resolver | detect API Gateway REST, HTTP API and ALB payloads |
/// | middleware | none |
/// | on_bind | accept every bound value |
/// | on_error | status from the error, `{"message": ...}` body |
/// | on_empty_response | `200 OK`, no body |
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use rack::Config;
/// use rack_core::{Context, HandlerResult};
/// use rack_events::EventFormat;
///
/// async fn accepted(ctx: Context) -> HandlerResult {
///     ctx.no_content(StatusCode::ACCEPTED)
/// }
///
/// let config = Config::new()
///     .with_format(EventFormat::Alb)
///     .with_empty_response(accepted);
/// # let _ = config;
/// ```
#[derive(Clone, Default)]
pub struct Config {
    pub(crate) resolver: Option<SharedResolver>,
    pub(crate) middleware: Chain,
    pub(crate) on_bind: Option<BindHook>,
    pub(crate) on_error: Option<BoxedErrorHandler>,
    pub(crate) on_empty_response: Option<BoxedHandler>,
}

impl Config {
    /// Creates a config with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the config described by deployment settings.
    ///
    /// `EventSource::Auto` keeps the detecting resolver; a named source pins
    /// every payload to that format. The request-id and tracing stages are
    /// installed, tagged with the service name.
    #[must_use]
    pub fn from_settings(settings: &RackSettings) -> Self {
        let config = Self::new()
            .with_middleware(RequestIdMiddleware::new())
            .with_middleware(TracingMiddleware::new(settings.service_name.clone()));

        match settings.event_source {
            EventSource::Auto => config,
            EventSource::ApiGatewayProxy => config.with_format(EventFormat::ApiGatewayProxy),
            EventSource::ApiGatewayV2 => config.with_format(EventFormat::ApiGatewayV2),
            EventSource::Alb => config.with_format(EventFormat::Alb),
        }
    }

    /// Sets the resolver.
    pub fn with_resolver<R: Resolver>(mut self, resolver: R) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Sets an already shared resolver.
    pub fn with_shared_resolver(mut self, resolver: SharedResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Pins every payload to one built-in format.
    pub fn with_format(self, format: EventFormat) -> Self {
        self.with_resolver(StaticResolver::from(format))
    }

    /// Appends a middleware. The first one added runs outermost.
    pub fn with_middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.middleware = self.middleware.with(middleware);
        self
    }

    /// Replaces the middleware chain.
    pub fn with_chain(mut self, chain: Chain) -> Self {
        self.middleware = chain;
        self
    }

    /// Sets the hook run after every successful [`Context::bind`].
    pub fn with_bind_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context, &dyn Any) -> HandlerResult + Send + Sync + 'static,
    {
        self.on_bind = Some(Arc::new(hook));
        self
    }

    /// Sets the error handler.
    pub fn with_error_handler<E: ErrorHandler>(mut self, on_error: E) -> Self {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    /// Sets the policy for invocations that wrote no status.
    pub fn with_empty_response<H: Handler>(mut self, on_empty_response: H) -> Self {
        self.on_empty_response = Some(Arc::new(on_empty_response));
        self
    }

    /// Returns the middleware chain.
    #[must_use]
    pub fn middleware(&self) -> &Chain {
        &self.middleware
    }

    pub(crate) fn resolver_or_default(&self) -> SharedResolver {
        self.resolver.clone().unwrap_or_else(default_resolver)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("resolver", &self.resolver.as_ref().map(|_| "custom"))
            .field("middleware", &self.middleware)
            .field("on_bind", &self.on_bind.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_empty_response", &self.on_empty_response.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rack_events::fixtures;

    #[test]
    fn test_empty_by_default() {
        let config = Config::new();
        assert!(config.resolver.is_none());
        assert!(config.middleware().is_empty());
        assert!(config.on_bind.is_none());
        assert!(config.on_error.is_none());
        assert!(config.on_empty_response.is_none());
    }

    #[test]
    fn test_from_settings_auto_detects() {
        let config = Config::from_settings(&RackSettings::default());
        assert!(config.resolver.is_none());
        assert_eq!(
            config.middleware().names().collect::<Vec<_>>(),
            ["request_id", "tracing"]
        );

        let processor = config
            .resolver_or_default()
            .resolve(fixtures::ALB_SINGLE_VALUE.as_bytes())
            .unwrap();
        assert_eq!(processor.name(), "alb");
    }

    #[test]
    fn test_from_settings_pins_format() {
        let settings = RackSettings {
            event_source: EventSource::ApiGatewayV2,
            ..RackSettings::default()
        };
        let resolver = Config::from_settings(&settings).resolver_or_default();

        let processor = resolver
            .resolve(fixtures::API_GATEWAY_PROXY.as_bytes())
            .unwrap();
        assert_eq!(processor.name(), "api_gateway_v2");
    }
}
