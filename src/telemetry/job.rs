//! Queue job span helpers.
//!
//! Provides span creation and outcome recording for queue jobs and remote
//! requests.

use crate::model::JobId;
use tracing::Span;

/// Start a span for one queue job.
///
/// The `job.outcome` field is declared empty and filled by
/// [`record_job_outcome`].
pub fn start_job_span(label: &str, job_id: &JobId, total: usize) -> Span {
    tracing::info_span!(
        "queue.job",
        "job.label" = label,
        "job.id" = %job_id,
        "job.total" = total,
        "job.outcome" = tracing::field::Empty,
    )
}

/// Record the final outcome ("completed" | "failed") on a job span.
pub fn record_job_outcome(span: &Span, outcome: &str) {
    span.record("job.outcome", outcome);
}

/// Start a span for a single remote request.
pub fn start_request_span(method: &str, path: &str) -> Span {
    tracing::debug_span!(
        "remote.request",
        "http.request.method" = method,
        "url.path" = path,
        "http.response.status_code" = tracing::field::Empty,
    )
}

/// Record the response status on a request span.
pub fn record_response_status(span: &Span, status: u16) {
    span.record("http.response.status_code", status);
}
