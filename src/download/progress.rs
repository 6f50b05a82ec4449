use crate::state::DownloadState;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Snapshot of the progress counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    /// Records in the pass
    pub total: usize,

    /// Records whose outcome counts as completed
    pub completed: usize,

    /// Terminal outcomes recorded so far
    pub outcomes: BTreeMap<DownloadState, usize>,
}

impl Progress {
    /// Completion percentage, `completed / total * 100`
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }

    /// Number of records that ended in the given state
    pub fn count(&self, state: DownloadState) -> usize {
        self.outcomes.get(&state).copied().unwrap_or(0)
    }

    /// Number of records that reached any terminal state
    pub fn finished(&self) -> usize {
        self.outcomes.values().sum()
    }
}

/// Shared progress counter for a download pass
///
/// The lock is held only for the counter update, never across a fetch.
#[derive(Debug)]
pub struct ProgressTracker {
    inner: Mutex<Progress>,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            inner: Mutex::new(Progress {
                total,
                ..Progress::default()
            }),
        }
    }

    /// Records a terminal outcome and logs the new percentage
    ///
    /// The progress line is emitted while the lock is held, so lines from
    /// concurrent workers come out in counter order.
    pub fn record(&self, state: DownloadState) -> Progress {
        let mut progress = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *progress.outcomes.entry(state).or_default() += 1;

        if state.counts_as_completed() {
            progress.completed += 1;
            tracing::info!(
                "Progress: {:.1}% ({}/{})",
                progress.percentage(),
                progress.completed,
                progress.total
            );
        }

        progress.clone()
    }

    /// Current counters
    pub fn snapshot(&self) -> Progress {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
