//! Queue engine: classify failures, retry transient ones, run items with
//! bounded concurrency, report progress.

pub mod classify;
pub mod progress;
pub mod queue;
pub mod retry;

pub use classify::{Classification, classify};
pub use progress::Progress;
pub use queue::QueueEngine;
pub use retry::{Backoff, RetryPolicy};
