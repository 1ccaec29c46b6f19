//! Error classification: retry or give up.
//!
//! The remote API reports failures as a JSON document in the error message.
//! A `status` in `[500, 600)` is a transient server condition; anything else
//! is terminal and gets compacted to a [`ClassifiedError`].

use crate::model::{ClassifiedError, ItemFailure, RemoteError};
use serde_json::Value;

/// Outcome of classifying a raw remote error.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Server-side condition, safe to retry.
    Transient,
    /// Retrying will not help.
    Terminal(ItemFailure),
}

impl Classification {
    pub fn is_transient(&self) -> bool {
        matches!(self, Classification::Transient)
    }
}

/// Classify a raw error. Never fails; unparseable errors pass through as
/// [`ItemFailure::Raw`].
pub fn classify(err: &RemoteError) -> Classification {
    let Ok(Value::Object(payload)) = serde_json::from_str::<Value>(&err.message) else {
        return Classification::Terminal(ItemFailure::Raw(err.clone()));
    };

    let Some(status) = payload.get("status").and_then(Value::as_u64) else {
        return Classification::Terminal(ItemFailure::Raw(err.clone()));
    };

    if (500..600).contains(&status) {
        return Classification::Transient;
    }

    Classification::Terminal(ItemFailure::Classified(ClassifiedError {
        kind: err.name.clone(),
        status: Some(status),
        status_text: payload.get("statusText").cloned(),
        message: payload.get("message").cloned(),
        details: payload.get("details").cloned(),
    }))
}

/// Pull the numeric `status` out of a JSON error message, if there is one.
pub fn parse_status(message: &str) -> Option<u64> {
    serde_json::from_str::<Value>(message).ok()?.get("status")?.as_u64()
}
