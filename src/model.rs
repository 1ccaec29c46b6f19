//! Core data model.
//!
//! The engine never interprets work items; everything here describes the
//! shapes that flow around them: raw remote failures, their compacted form,
//! per-item terminal outcomes and job progress.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Job identity
// ---------------------------------------------------------------------------

/// Newtype for queue job IDs. Used only to correlate logs and spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short display: first 8 chars of UUID
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Remote failures
// ---------------------------------------------------------------------------

/// A raw failure returned by the remote handle.
///
/// For API errors `message` holds a JSON document with at least a `status`
/// field. Transport failures carry plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{name}: {message}")]
pub struct RemoteError {
    /// Error name, e.g. `NotFound`, `ServerError` or `HttpError`.
    pub name: String,
    pub message: String,
}

impl RemoteError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Build an error whose message is the pretty-printed JSON `payload`.
    pub fn from_payload(name: impl Into<String>, payload: &serde_json::Value) -> Self {
        Self {
            name: name.into(),
            message: friendly_json(payload),
        }
    }
}

/// The compacted shape of a terminal API error.
///
/// Only these four fields survive classification. Values are copied as
/// they are, `null` included; fields absent from the remote payload stay
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedError {
    /// Name of the raw error this was built from.
    #[serde(skip)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u64>,
    #[serde(
        default,
        rename = "statusText",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_text: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ClassifiedError {
    /// The compact fields rendered as one pretty-printed JSON string.
    pub fn to_message(&self) -> String {
        match serde_json::to_value(self) {
            Ok(value) => friendly_json(&value),
            Err(_) => String::from("{}"),
        }
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.to_message())
    }
}

impl std::error::Error for ClassifiedError {}

/// Why a single item permanently failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ItemFailure {
    /// Non-5xx API error, compacted.
    #[error("{0}")]
    Classified(ClassifiedError),
    /// Unclassifiable error, or a transient one that exhausted its retries.
    #[error("{0}")]
    Raw(RemoteError),
}

impl ItemFailure {
    /// HTTP-style status, when one is known.
    pub fn status(&self) -> Option<u64> {
        match self {
            ItemFailure::Classified(e) => e.status,
            ItemFailure::Raw(e) => crate::engine::classify::parse_status(&e.message),
        }
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Snapshot of a job's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub completed: usize,
    pub total: usize,
}

impl ProgressState {
    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }

    /// Completion percentage, 100 for an empty job.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        self.completed * 100 / self.total
    }
}

impl std::fmt::Display for ProgressState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pretty-print JSON with the line and paragraph separators escaped, so the
/// result is safe to embed in JavaScript source.
pub fn friendly_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| value.to_string())
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
