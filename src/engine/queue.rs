//! Bounded queue engine.
//!
//! Runs one retry-wrapped operation per item with at most `concurrency`
//! items in flight. In-flight futures are polled together on the caller's
//! task, so operations need not be `Send` or `'static`.

use std::cell::Cell;
use std::future::Future;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use opentelemetry::KeyValue;
use tokio::time::Instant;
use tracing::{Instrument, error, info};

use super::progress::Progress;
use super::retry::{self, RetryPolicy};
use crate::config::QueueOptions;
use crate::error::{Error, JobFailure, Result};
use crate::model::{JobId, RemoteError};
use crate::telemetry::{job, metrics};

/// Schedules queue jobs. Cheap to clone; holds only configuration.
#[derive(Debug, Clone)]
pub struct QueueEngine {
    policy: RetryPolicy,
    options: QueueOptions,
    progress: bool,
}

impl QueueEngine {
    pub fn new(policy: RetryPolicy, options: QueueOptions, progress: bool) -> Self {
        Self {
            policy,
            options,
            progress,
        }
    }

    /// Same queue settings, different retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn options(&self) -> &QueueOptions {
        &self.options
    }

    /// Run `op` over every item and return the results in input order.
    pub async fn run<'a, T, R, F, Fut>(&self, label: &str, items: &'a [T], op: F) -> Result<Vec<R>>
    where
        F: Fn(&'a T) -> Fut,
        Fut: Future<Output = std::result::Result<R, RemoteError>> + 'a,
    {
        let progress = Progress::new(items.len(), label, self.progress);
        self.run_tracked(&progress, items, op).await
    }

    /// Like [`run`](Self::run), reporting into a caller-owned progress handle.
    ///
    /// The first terminal failure rejects the job: no further items are
    /// started, including admitted items still waiting out the start delay.
    /// Items whose operation already began run to completion and their
    /// results are discarded.
    pub async fn run_tracked<'a, T, R, F, Fut>(
        &self,
        progress: &Progress,
        items: &'a [T],
        op: F,
    ) -> Result<Vec<R>>
    where
        F: Fn(&'a T) -> Fut,
        Fut: Future<Output = std::result::Result<R, RemoteError>> + 'a,
    {
        if self.options.concurrency == 0 {
            return Err(Error::InvalidInput(
                "queue concurrency must be at least 1".to_string(),
            ));
        }

        let job_id = JobId::new();
        let span = job::start_job_span(progress.label(), &job_id, items.len());

        async {
            let started = Instant::now();
            let label = progress.label().to_string();
            let delay = self.options.delay();
            let policy = &self.policy;
            let op = &op;
            let rejected = Cell::new(false);
            let rejected = &rejected;

            let mut pending = items.iter().enumerate();
            let mut in_flight = FuturesUnordered::new();
            let mut results: Vec<Option<R>> = Vec::with_capacity(items.len());
            results.resize_with(items.len(), || None);
            let mut failure: Option<JobFailure> = None;
            let mut last_start: Option<Instant> = None;

            loop {
                if failure.is_none() {
                    while in_flight.len() < self.options.concurrency {
                        let Some((index, item)) = pending.next() else {
                            break;
                        };
                        let start_at = next_start(last_start, delay);
                        last_start = Some(start_at);
                        in_flight.push(async move {
                            tokio::time::sleep_until(start_at).await;
                            // Admitted but still waiting when the job failed.
                            if rejected.get() {
                                return (index, None);
                            }
                            (index, Some(retry::attempt(|| op(item), policy).await))
                        });
                    }
                }

                let Some((index, outcome)) = in_flight.next().await else {
                    break;
                };
                let Some(outcome) = outcome else {
                    continue;
                };
                progress.tick();

                match outcome {
                    Ok(value) => {
                        record_settled(&label, "ok");
                        if failure.is_none() {
                            results[index] = Some(value);
                        }
                    }
                    Err(item_failure) => {
                        record_settled(&label, "failed");
                        if failure.is_none() {
                            error!(
                                index,
                                status = item_failure.status(),
                                error = %item_failure,
                                "item failed, rejecting job"
                            );
                            rejected.set(true);
                            failure = Some(JobFailure {
                                index,
                                failure: item_failure,
                                progress: progress.state(),
                            });
                        }
                    }
                }
            }

            let duration_ms = started.elapsed().as_millis() as f64;
            if let Some(failure) = failure {
                job::record_job_outcome(&tracing::Span::current(), "failed");
                metrics::job_duration_ms().record(
                    duration_ms,
                    &[KeyValue::new("label", label), KeyValue::new("outcome", "failed")],
                );
                return Err(Error::from(failure));
            }

            job::record_job_outcome(&tracing::Span::current(), "completed");
            metrics::job_duration_ms().record(
                duration_ms,
                &[KeyValue::new("label", label.clone()), KeyValue::new("outcome", "completed")],
            );
            info!(
                label = %label,
                items = results.len(),
                duration_ms,
                "queue job completed"
            );

            results
                .into_iter()
                .collect::<Option<Vec<R>>>()
                .ok_or_else(|| Error::Other("queue job finished with unsettled items".to_string()))
        }
        .instrument(span)
        .await
    }
}

/// Starts are spaced at least `delay` apart; the first item starts at once.
fn next_start(last_start: Option<Instant>, delay: Duration) -> Instant {
    let now = Instant::now();
    match last_start {
        Some(last) => (last + delay).max(now),
        None => now,
    }
}

fn record_settled(label: &str, outcome: &'static str) {
    metrics::queue_items().add(
        1,
        &[
            KeyValue::new("label", label.to_string()),
            KeyValue::new("outcome", outcome),
        ],
    );
}
