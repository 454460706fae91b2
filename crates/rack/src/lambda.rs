//! Binding to the Lambda runtime.
//!
//! Enabled with the `lambda` feature.
//!
//! ```rust,ignore
//! use http::StatusCode;
//! use rack::prelude::*;
//!
//! async fn hello(ctx: Context) -> HandlerResult {
//!     ctx.string(StatusCode::OK, "hello")
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lambda_runtime::Error> {
//!     rack::lambda::run(Rack::new(hello)).await
//! }
//! ```

use crate::Rack;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use rack_core::Invocation;
use serde_json::Value;
use std::time::{Duration, UNIX_EPOCH};

/// Serves `rack` from the Lambda runtime until the runtime shuts down.
///
/// # Errors
///
/// Returns the runtime's error if the runtime API becomes unreachable.
pub async fn run(rack: Rack) -> Result<(), Error> {
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let rack = rack.clone();
        async move { handle(&rack, event).await }
    }))
    .await
}

/// Runs one runtime event through `rack`.
///
/// Invocation errors are returned to the runtime, which reports them as a
/// failed invocation.
pub async fn handle(rack: &Rack, event: LambdaEvent<Value>) -> Result<Value, Error> {
    let LambdaEvent { payload, context } = event;

    let invocation = Invocation::new()
        .with_request_id(context.request_id)
        .with_deadline(UNIX_EPOCH + Duration::from_millis(context.deadline));

    let payload = serde_json::to_vec(&payload)?;
    let response = rack.invoke(invocation, &payload).await?;
    Ok(serde_json::from_slice(&response)?)
}
