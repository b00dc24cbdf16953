use std::path::PathBuf;

use thiserror::Error;

pub type BatchId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferJob {
    pub title: String,
    pub source_path: PathBuf,
}

/// Why a single upload did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    #[error("cannot read source file: {0}")]
    Io(String),
    #[error("cannot reach the device (connection refused)")]
    ConnectionRefused,
    #[error("cannot reach the device: {0}")]
    Network(String),
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    #[error("unexpected {kind} error: {message}")]
    Unexpected { kind: String, message: String },
}

impl FailureKind {
    pub fn is_network(&self) -> bool {
        matches!(self, FailureKind::ConnectionRefused | FailureKind::Network(_))
    }

    pub(crate) fn unexpected(kind: &str, message: impl Into<String>) -> Self {
        FailureKind::Unexpected {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Success,
    Failure { reason: String },
}

impl From<Result<(), FailureKind>> for TransferOutcome {
    fn from(result: Result<(), FailureKind>) -> Self {
        match result {
            Ok(()) => TransferOutcome::Success,
            Err(kind) => TransferOutcome::Failure {
                reason: kind.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    pub batch_id: BatchId,
    /// 1-based position of the job about to be uploaded.
    pub index: usize,
    pub total: usize,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTransfer {
    pub title: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub batch_id: BatchId,
    pub success_count: usize,
    pub failures: Vec<FailedTransfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeResult {
    pub reachable: bool,
    pub status_code: Option<u16>,
    pub body: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    BatchProgress(BatchProgress),
    BatchCompleted(BatchSummary),
    ProbeCompleted { endpoint: String, result: ProbeResult },
}
