//! # Rack Core
//!
//! Core types shared by every Rack crate:
//!
//! - [`Request`] / [`Response`] - The canonical model every wire format maps onto
//! - [`Context`] - Per-invocation handler context with response writers and a scratch store
//! - [`Invocation`] - Request id, deadline and cancellation from the host runtime
//! - [`StatusError`] / [`status_code`] - Status-carrying errors and cause-chain lookup
//! - [`Handler`] / [`ErrorHandler`] - Handler traits, implemented for async closures

#![doc(html_root_url = "https://docs.rs/rack-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod handler;
mod invocation;
mod request;
mod response;

pub use context::Context;
pub use error::{status_code, status_code_of, BoxError, StatusError};
pub use handler::{
    boxed, BindHook, BoxFuture, BoxedErrorHandler, BoxedHandler, ErrorHandler, Handler,
    HandlerResult,
};
pub use invocation::Invocation;
pub use request::{Event, PathParams, QueryParams, Request};
pub use response::Response;
