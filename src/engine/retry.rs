//! Retry driver: re-invoke an operation while its failures are transient.

use std::future::Future;
use std::time::Duration;

use opentelemetry::KeyValue;
use tracing::{debug, warn};

use super::classify::{Classification, classify};
use crate::model::{ItemFailure, RemoteError};
use crate::telemetry::metrics;

/// Delay strategy between attempts.
#[derive(Debug, Clone)]
pub enum Backoff {
    /// Retry immediately.
    None,
    Fixed(Duration),
    /// `min * factor^(retry - 1)`, capped at `max` when set.
    Exponential {
        min: Duration,
        factor: f64,
        max: Option<Duration>,
    },
    Custom(fn(u32) -> Duration),
}

impl Backoff {
    /// Wait before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        match self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential { min, factor, max } => {
                let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
                let millis = min.as_millis() as f64 * factor.powi(exponent);
                let capped = match max {
                    Some(max) => millis.min(max.as_millis() as f64),
                    None => millis,
                };
                // Saturates on overflow or NaN.
                Duration::from_millis(capped as u64)
            }
            Backoff::Custom(f) => f(retry),
        }
    }
}

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum re-invocations after the first attempt.
    pub retries: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Never retry.
    pub fn none() -> Self {
        Self {
            retries: 0,
            backoff: Backoff::None,
        }
    }

    pub fn new(retries: u32, backoff: Backoff) -> Self {
        Self { retries, backoff }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        crate::config::RetryOptions::default().policy()
    }
}

/// Run `op` until it succeeds, fails terminally, or runs out of retries.
///
/// Terminal failures surface on first encounter. A transient failure on the
/// last allowed attempt surfaces as the raw error, not reclassified.
pub async fn attempt<R, F, Fut>(mut op: F, policy: &RetryPolicy) -> Result<R, ItemFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R, RemoteError>>,
{
    let mut retry = 0u32;
    loop {
        debug!(attempt = retry + 1, "invoking operation");
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        match classify(&err) {
            Classification::Terminal(failure) => {
                debug!(attempt = retry + 1, error = %err.name, "terminal failure");
                return Err(failure);
            }
            Classification::Transient if retry >= policy.retries => {
                warn!(
                    attempts = retry + 1,
                    error = %err.name,
                    "retries exhausted"
                );
                return Err(ItemFailure::Raw(err));
            }
            Classification::Transient => {
                retry += 1;
                let delay = policy.backoff.delay(retry);
                warn!(
                    retry,
                    max_retries = policy.retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err.name,
                    "transient failure, retrying"
                );
                metrics::queue_retries().add(1, &[KeyValue::new("error", err.name.clone())]);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
