//! Integration tests for telemetry initialization and span helpers.

use spaceq::model::JobId;
use spaceq::telemetry::{TelemetryConfig, init_telemetry, job, metrics};

#[test]
fn telemetry_initializes_without_endpoint() {
    // The global subscriber can only be set once per process; a second
    // init returning Err is acceptable.
    let config = TelemetryConfig {
        endpoint: None,
        service_name: "spaceq-test".to_string(),
        log_level: "debug".to_string(),
    };
    if let Ok(guard) = init_telemetry(config) {
        assert!(!guard.is_exporting());
    }
}

#[test]
fn job_span_creates_and_records_outcome() {
    let id = JobId::new();
    let span = job::start_job_span("<Space.createEntry>", &id, 5);
    job::record_job_outcome(&span, "completed");
}

#[test]
fn request_span_records_status() {
    let span = job::start_request_span("PUT", "entries/e1/published");
    job::record_response_status(&span, 200);
}

#[test]
fn queue_instruments_accept_measurements() {
    metrics::queue_items().add(1, &[]);
    metrics::queue_retries().add(1, &[]);
    metrics::job_duration_ms().record(12.5, &[]);
    metrics::remote_requests().add(1, &[]);
}
