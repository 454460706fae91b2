//! Invocation metrics.
//!
//! Metrics go through the [`metrics`] facade. No exporter is bundled; install
//! one (EMF, Prometheus push, StatsD) in the function's `main`. Without a
//! recorder every call here is a no-op.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `rack_invocations_total` | Counter | `format`, `status` | Completed invocations |
//! | `rack_invocation_duration_seconds` | Histogram | `format` | Invocation latency |
//! | `rack_invocation_aborts_total` | Counter | `stage` | Invocations that produced no response |
//! | `rack_in_flight_invocations` | Gauge | - | Invocations currently running |

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Completed invocations counter.
pub const INVOCATIONS_TOTAL: &str = "rack_invocations_total";
/// Invocation latency histogram.
pub const INVOCATION_DURATION: &str = "rack_invocation_duration_seconds";
/// Aborted invocations counter.
pub const INVOCATION_ABORTS: &str = "rack_invocation_aborts_total";
/// In-flight invocations gauge.
pub const IN_FLIGHT_INVOCATIONS: &str = "rack_in_flight_invocations";

/// Registers descriptions for all standard metrics with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(INVOCATIONS_TOTAL, "Total number of invocations that produced a response");
    describe_histogram!(
        INVOCATION_DURATION,
        metrics::Unit::Seconds,
        "Invocation duration in seconds"
    );
    describe_counter!(INVOCATION_ABORTS, "Total number of invocations aborted without a response");
    describe_gauge!(IN_FLIGHT_INVOCATIONS, "Number of invocations currently being processed");
}

/// Records an invocation that produced a response.
///
/// # Arguments
///
/// * `format` - Name of the processor that handled the payload
/// * `status_code` - Status code of the encoded response
/// * `duration` - Time from payload receipt to encoded response
pub fn record_invocation(format: &'static str, status_code: u16, duration: Duration) {
    counter!(
        INVOCATIONS_TOTAL,
        "format" => format,
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(INVOCATION_DURATION, "format" => format).record(duration.as_secs_f64());
}

/// Records an invocation aborted at `stage`.
pub fn record_abort(stage: &'static str) {
    counter!(INVOCATION_ABORTS, "stage" => stage).increment(1);
}

/// Guard that tracks an in-flight invocation until dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Creates a new guard and increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(IN_FLIGHT_INVOCATIONS).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(IN_FLIGHT_INVOCATIONS).decrement(1.0);
    }
}
