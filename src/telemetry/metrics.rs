//! Metric instrument factories for spaceq.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"spaceq"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for spaceq instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("spaceq")
}

/// Counter: queue items settled.
/// Labels: `label`, `outcome` ("ok" | "failed").
pub fn queue_items() -> Counter<u64> {
    meter()
        .u64_counter("spaceq.queue.items")
        .with_description("Number of queue items settled")
        .build()
}

/// Counter: retries scheduled after a transient failure.
/// Labels: `error`.
pub fn queue_retries() -> Counter<u64> {
    meter()
        .u64_counter("spaceq.queue.retries")
        .with_description("Number of retries after transient failures")
        .build()
}

/// Histogram: queue job duration in milliseconds.
/// Labels: `label`, `outcome`.
pub fn job_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("spaceq.queue.job.duration_ms")
        .with_description("Queue job duration in milliseconds")
        .with_unit("ms")
        .build()
}

/// Counter: remote API requests.
/// Labels: `method`, `status`.
pub fn remote_requests() -> Counter<u64> {
    meter()
        .u64_counter("spaceq.remote.requests")
        .with_description("Number of remote API requests")
        .build()
}
