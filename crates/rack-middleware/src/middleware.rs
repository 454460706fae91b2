//! Core middleware trait and types.
//!
//! A [`Middleware`] wraps the rest of the chain. It receives the invocation
//! [`Context`] and a [`Next`] handle; code before `next.run(ctx)` runs on the
//! way in, code after it runs on the way out.
//!
//! # Example
//!
//! ```
//! use rack_core::{BoxFuture, Context, HandlerResult};
//! use rack_middleware::{Middleware, Next};
//!
//! struct LoggingMiddleware;
//!
//! impl Middleware for LoggingMiddleware {
//!     fn name(&self) -> &'static str {
//!         "logging"
//!     }
//!
//!     fn process<'a>(&'a self, ctx: Context, next: Next) -> BoxFuture<'a, HandlerResult> {
//!         Box::pin(async move {
//!             println!("request: {}", ctx.request().raw_path);
//!             let result = next.run(ctx.clone()).await;
//!             println!("response: {:?}", ctx.response().status);
//!             result
//!         })
//!     }
//! }
//! ```

use rack_core::{BoxFuture, BoxedHandler, Context, Handler, HandlerResult};
use std::future::Future;
use std::sync::Arc;

/// A shared, type-erased middleware.
pub type SharedMiddleware = Arc<dyn Middleware>;

/// A transformation wrapping the rest of the chain.
///
/// # Invariants
///
/// - Middleware calls `next.run()` at most once; not calling it short-circuits
///   the chain.
/// - Errors from downstream should be returned, not swallowed, so the error
///   handler sees them.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used in logs.
    fn name(&self) -> &'static str;

    /// Processes the invocation, calling `next` to continue the chain.
    fn process<'a>(&'a self, ctx: Context, next: Next) -> BoxFuture<'a, HandlerResult>;
}

/// Handle to the remainder of the chain.
///
/// Consumed by [`Next::run`], so it can only be invoked once.
pub struct Next {
    handler: BoxedHandler,
}

impl Next {
    pub(crate) fn new(handler: BoxedHandler) -> Self {
        Self { handler }
    }

    /// Invokes the next middleware, or the handler at the end of the chain.
    pub async fn run(self, ctx: Context) -> HandlerResult {
        self.handler.call(ctx).await
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// A middleware bound to the handler it wraps.
pub(crate) struct Wrapped {
    middleware: SharedMiddleware,
    next: BoxedHandler,
}

impl Wrapped {
    pub(crate) fn new(middleware: SharedMiddleware, next: BoxedHandler) -> Self {
        Self { middleware, next }
    }
}

impl Handler for Wrapped {
    fn call(&self, ctx: Context) -> BoxFuture<'static, HandlerResult> {
        let middleware = Arc::clone(&self.middleware);
        let next = Next::new(Arc::clone(&self.next));
        Box::pin(async move { middleware.process(ctx, next).await })
    }
}

/// A middleware built from an async function.
///
/// # Example
///
/// ```
/// use rack_core::Context;
/// use rack_middleware::{FnMiddleware, Next};
///
/// let timing = FnMiddleware::new("timing", |ctx: Context, next: Next| async move {
///     let start = std::time::Instant::now();
///     let result = next.run(ctx).await;
///     println!("took {:?}", start.elapsed());
///     result
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(&'a self, ctx: Context, next: Next) -> BoxFuture<'a, HandlerResult> {
        Box::pin((self.func)(ctx, next))
    }
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use rack_core::{boxed, Invocation, Request};

    fn ctx() -> Context {
        Context::new(Invocation::new(), Request::new("GET", "/"))
    }

    async fn unreachable_handler(_: Context) -> HandlerResult {
        anyhow::bail!("handler must not run")
    }

    async fn failing(_: Context) -> HandlerResult {
        anyhow::bail!("boom")
    }

    #[tokio::test]
    async fn test_fn_middleware_runs_next() {
        let middleware: SharedMiddleware = Arc::new(FnMiddleware::new(
            "mark",
            |ctx: Context, next: Next| async move {
                ctx.set("seen", true);
                next.run(ctx).await
            },
        ));
        let handler = boxed(|ctx: Context| async move { ctx.no_content(StatusCode::ACCEPTED) });

        let wrapped = Wrapped::new(middleware, handler);
        let ctx = ctx();
        wrapped.call(ctx.clone()).await.unwrap();

        assert_eq!(ctx.get::<bool>("seen").as_deref(), Some(&true));
        assert_eq!(ctx.response().status, Some(StatusCode::ACCEPTED));
    }

    #[tokio::test]
    async fn test_short_circuit_skips_handler() {
        let middleware: SharedMiddleware = Arc::new(FnMiddleware::new(
            "deny",
            |ctx: Context, _next: Next| async move { ctx.string(StatusCode::FORBIDDEN, "denied") },
        ));
        let handler = boxed(unreachable_handler);

        let ctx = ctx();
        Wrapped::new(middleware, handler)
            .call(ctx.clone())
            .await
            .unwrap();

        assert_eq!(ctx.response().status, Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_downstream_error_propagates() {
        let middleware: SharedMiddleware =
            Arc::new(FnMiddleware::new("pass", |ctx: Context, next: Next| next.run(ctx)));
        let handler = boxed(failing);

        let err = Wrapped::new(middleware, handler).call(ctx()).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_name() {
        let middleware = FnMiddleware::new("named", |ctx: Context, next: Next| next.run(ctx));
        assert_eq!(middleware.name(), "named");
    }
}
