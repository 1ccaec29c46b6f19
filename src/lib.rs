//! # spaceq
//!
//! Batching and retry layer in front of a content-management API.
//!
//! Localizes field payloads, then drives one remote call per work item
//! through a bounded-concurrency queue. Transient (5xx) failures are
//! retried with backoff; anything else rejects the job with a compact error.
//! Results come back in input order.

pub mod client;
pub mod collection;
pub mod config;
pub mod engine;
pub mod error;
pub mod localize;
pub mod model;
pub mod remote;
pub mod telemetry;

pub use client::{Client, Space};
pub use collection::{Collection, Page};
pub use config::ClientOptions;
pub use engine::{Backoff, Progress, QueueEngine, RetryPolicy};
pub use error::{Error, JobFailure, Result};
pub use localize::{FieldMap, LocalizedFields, OneOrMany};
pub use model::{ClassifiedError, ItemFailure, ProgressState, RemoteError};
