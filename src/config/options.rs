//! Client options, loadable from TOML.
//!
//! ```toml
//! locale = "de-DE"
//! progress = false
//!
//! [retry_options]
//! retries = 3
//!
//! [queue_options]
//! concurrency = 2
//! delay = 100
//! ```

use crate::engine::retry::{Backoff, RetryPolicy};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Locale tag used by the field localizer.
    pub locale: String,
    #[serde(rename = "retry_options")]
    pub retry: RetryOptions,
    #[serde(rename = "queue_options")]
    pub queue: QueueOptions,
    /// Report progress for each queue job.
    pub progress: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            retry: RetryOptions::default(),
            queue: QueueOptions::default(),
            progress: true,
        }
    }
}

impl ClientOptions {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("bad client options: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read options file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retry.retries = retries;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.queue.concurrency = concurrency;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.queue.delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }
}

/// Retry tuning. Delay before retry `n` is
/// `min_timeout * factor^(n - 1)`, capped at `max_timeout` when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Maximum re-invocations per item after the first attempt.
    pub retries: u32,
    pub factor: f64,
    #[serde(alias = "minTimeout")]
    pub min_timeout_ms: u64,
    #[serde(alias = "maxTimeout")]
    pub max_timeout_ms: Option<u64>,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            retries: 10,
            factor: 2.0,
            min_timeout_ms: 1000,
            max_timeout_ms: None,
        }
    }
}

impl RetryOptions {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            backoff: Backoff::Exponential {
                min: Duration::from_millis(self.min_timeout_ms),
                factor: self.factor,
                max: self.max_timeout_ms.map(Duration::from_millis),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueOptions {
    /// Maximum operations in flight.
    pub concurrency: usize,
    /// Wait in milliseconds before starting each item after the first.
    #[serde(rename = "delay")]
    pub delay_ms: u64,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            concurrency: 5,
            delay_ms: 0,
        }
    }
}

impl QueueOptions {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
