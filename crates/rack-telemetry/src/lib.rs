//! Logging and metrics for Rack functions.
//!
//! - **Logging**: JSON or pretty `tracing-subscriber` output with an env filter
//! - **Metrics**: invocation counters and latency through the `metrics` facade
//!
//! # Example
//!
//! ```rust,ignore
//! use rack_telemetry::{init_telemetry, LogConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry(&LogConfig::production())?;
//!     // build and run the function...
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use self::metrics::{describe_metrics, record_abort, record_invocation, InFlightGuard};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging and registers metric descriptions.
///
/// Install a metrics recorder before calling this if descriptions should
/// reach the exporter.
///
/// # Errors
///
/// Returns `TelemetryError` if logging fails to initialize.
pub fn init_telemetry(logging: &LogConfig) -> TelemetryResult<()> {
    init_logging(logging)?;
    describe_metrics();
    Ok(())
}
