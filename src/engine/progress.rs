//! Progress reporting for queue jobs.
//!
//! Purely observational: a tick increments a counter and, when enabled, logs
//! the rendered bar. It never waits.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use crate::model::ProgressState;

const BAR_WIDTH: usize = 20;

/// Progress handle for one job. Clones share the same counter.
#[derive(Debug, Clone)]
pub struct Progress {
    label: Arc<str>,
    total: usize,
    completed: Arc<AtomicUsize>,
    enabled: bool,
}

impl Progress {
    pub fn new(total: usize, label: impl Into<Arc<str>>, enabled: bool) -> Self {
        Self {
            label: label.into(),
            total,
            completed: Arc::new(AtomicUsize::new(0)),
            enabled,
        }
    }

    /// Record one settled item.
    pub fn tick(&self) {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if self.enabled {
            let state = ProgressState {
                completed,
                total: self.total,
            };
            info!(
                label = %self.label,
                completed,
                total = self.total,
                percent = state.percent(),
                "{}",
                render_bar(&self.label, state)
            );
        }
    }

    pub fn state(&self) -> ProgressState {
        ProgressState {
            completed: self.completed.load(Ordering::Relaxed),
            total: self.total,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// e.g. `<Space.createEntry> [============        ] 3/5 (60%)`
    pub fn render(&self) -> String {
        render_bar(&self.label, self.state())
    }
}

fn render_bar(label: &str, state: ProgressState) -> String {
    let filled = if state.total == 0 {
        BAR_WIDTH
    } else {
        (state.completed.min(state.total) * BAR_WIDTH) / state.total
    };
    format!(
        "{label} [{}{}] {}/{} ({}%)",
        "=".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        state.completed,
        state.total,
        state.percent()
    )
}
