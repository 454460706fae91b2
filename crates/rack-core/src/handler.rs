//! Handler traits.
//!
//! A [`Handler`] receives the per-invocation [`Context`] and writes the
//! response through it. Any `Fn(Context) -> impl Future<Output = HandlerResult>`
//! closure or `async fn` is a handler.

use crate::Context;
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The result returned by handlers, middleware and policy callbacks.
pub type HandlerResult = anyhow::Result<()>;

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// A shared, type-erased error handler.
pub type BoxedErrorHandler = Arc<dyn ErrorHandler>;

/// Callback run after a successful [`Context::bind`], e.g. for validation.
///
/// Receives the freshly decoded target as `&dyn Any`.
pub type BindHook = Arc<dyn Fn(&Context, &dyn Any) -> HandlerResult + Send + Sync>;

/// Processes one invocation.
///
/// # Example
///
/// ```rust,ignore
/// use rack_core::{Context, HandlerResult};
/// use http::StatusCode;
///
/// async fn hello(ctx: Context) -> HandlerResult {
///     let req = ctx.request();
///     let body = format!("{} {}", req.method, req.raw_path);
///     ctx.string(StatusCode::OK, body)
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Runs the handler against the context.
    fn call(&self, ctx: Context) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(ctx))
    }
}

/// Turns a handler error into a response, or re-raises it.
///
/// Returning `Err` aborts the invocation without a response.
pub trait ErrorHandler: Send + Sync + 'static {
    /// Handles `err` raised while processing `ctx`.
    fn handle(&self, ctx: Context, err: anyhow::Error) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> ErrorHandler for F
where
    F: Fn(Context, anyhow::Error) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn handle(&self, ctx: Context, err: anyhow::Error) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(ctx, err))
    }
}

/// Boxes a handler into a [`BoxedHandler`].
pub fn boxed<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Invocation, Request};
    use http::StatusCode;

    async fn created(ctx: Context) -> HandlerResult {
        ctx.no_content(StatusCode::CREATED)
    }

    #[tokio::test]
    async fn test_async_fn_is_handler() {
        let handler = boxed(created);
        let ctx = Context::new(Invocation::new(), Request::new("GET", "/"));

        handler.call(ctx.clone()).await.expect("handler should succeed");
        assert_eq!(ctx.response().status, Some(StatusCode::CREATED));
    }

    #[tokio::test]
    async fn test_closure_is_error_handler() {
        let on_error: BoxedErrorHandler =
            Arc::new(|ctx: Context, err: anyhow::Error| async move {
                ctx.string(StatusCode::BAD_GATEWAY, err.to_string())
            });
        let ctx = Context::new(Invocation::new(), Request::new("GET", "/"));

        on_error
            .handle(ctx.clone(), anyhow::anyhow!("upstream"))
            .await
            .expect("error handler should succeed");

        let res = ctx.response();
        assert_eq!(res.status, Some(StatusCode::BAD_GATEWAY));
        assert_eq!(res.body, "upstream");
    }
}
