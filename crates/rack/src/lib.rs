//! # Rack
//!
//! Write one HTTP handler, deploy it behind any Lambda HTTP integration:
//!
//! - API Gateway REST APIs (proxy integration, payload 1.0)
//! - API Gateway HTTP APIs (payload 2.0)
//! - Application Load Balancer target groups
//!
//! Each raw event is matched to a format, decoded into a canonical
//! [`Request`](rack_core::Request), passed through middleware to the handler,
//! and the [`Response`](rack_core::Response) the handler writes is encoded
//! back into the same format.
//!
//! ## Quick Start
//!
//! ```rust
//! use http::StatusCode;
//! use rack::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Default)]
//! struct Greeting {
//!     name: String,
//! }
//!
//! async fn greet(ctx: Context) -> HandlerResult {
//!     let mut greeting = Greeting::default();
//!     ctx.bind(&mut greeting)?;
//!     if greeting.name.is_empty() {
//!         return Err(StatusError::bad_request("name is required").into());
//!     }
//!     ctx.string(StatusCode::OK, format!("hello {}", greeting.name))
//! }
//!
//! let rack = Rack::with_config(
//!     Config::new().with_middleware(RequestIdMiddleware::new()),
//!     greet,
//! );
//! # let _ = rack;
//! ```
//!
//! With the `lambda` feature, [`lambda::run`] serves a [`Rack`] from the
//! Lambda runtime. Deployment settings load through [`rack_config`] and map
//! onto a pipeline with [`Config::from_settings`].
//!
//! ## Pipeline
//!
//! ```text
//! Payload → Resolve → Decode → Middleware → Handler
//!                                              ↓
//! Payload ← Encode ← EmptyResponse ← OnError ←─┘
//! ```

#![doc(html_root_url = "https://docs.rs/rack/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
pub mod defaults;
mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
mod pipeline;

pub use config::Config;
pub use error::InvocationError;
pub use pipeline::Rack;

pub use rack_config as settings;
pub use rack_core as core;
pub use rack_events as events;
pub use rack_middleware as middleware;
pub use rack_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use rack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Config, InvocationError, Rack};

    pub use rack_core::{
        status_code, Context, Handler, HandlerResult, Invocation, Request, Response, StatusError,
    };

    pub use rack_events::{EventFormat, Processor, Resolver};

    pub use rack_middleware::stages::{RequestIdMiddleware, TracingMiddleware};
    pub use rack_middleware::{Chain, FnMiddleware, Middleware, Next};
}
