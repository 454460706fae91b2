//! # Rack Middleware
//!
//! Composable middleware for Rack handlers.
//!
//! Middleware wraps the handler to add cross-cutting behavior. A [`Chain`]
//! composes middleware in nested order, so the first middleware's "before"
//! code runs first and its "after" code runs last:
//!
//! ```text
//! Chain[m1, m2].then(h)
//!
//! m1 before → m2 before → h → m2 after → m1 after
//! ```
//!
//! ## Example
//!
//! ```
//! use http::StatusCode;
//! use rack_core::{boxed, Context};
//! use rack_middleware::stages::{RequestIdMiddleware, TracingMiddleware};
//! use rack_middleware::Chain;
//!
//! let chain = Chain::new()
//!     .with(RequestIdMiddleware::new())
//!     .with(TracingMiddleware::new("orders"));
//!
//! let handler = chain.then(boxed(|ctx: Context| async move {
//!     ctx.no_content(StatusCode::OK)
//! }));
//! # let _ = handler;
//! ```

#![doc(html_root_url = "https://docs.rs/rack-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod middleware;
pub mod stages;

pub use chain::Chain;
pub use middleware::{FnMiddleware, Middleware, Next, SharedMiddleware};
