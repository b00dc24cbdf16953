use std::path::PathBuf;

pub type BatchId = u64;

/// One file queued for transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub title: String,
    pub source_path: PathBuf,
}

/// A ledger entry: an item that was not delivered, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub title: String,
    pub reason: String,
}

impl FailedItem {
    pub fn new(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reason: reason.into(),
        }
    }
}

/// Emitted once per job, right before its upload starts. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub index: usize,
    pub total: usize,
    pub title: String,
}

/// Tally reported by the worker for the jobs it was handed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchResult {
    pub success_count: usize,
    pub failures: Vec<FailedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeOutcome {
    pub reachable: bool,
    pub status_code: Option<u16>,
    pub body: String,
    pub error: Option<String>,
}
