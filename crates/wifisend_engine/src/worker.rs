use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};

use futures_util::FutureExt;
use transfer_logging::{transfer_info, transfer_warn};

use crate::{
    BatchId, BatchProgress, BatchSummary, EngineEvent, FailedTransfer, FailureKind, TransferJob,
    TransferOutcome, Uploader,
};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Uploads one batch of jobs, strictly one after another.
///
/// A worker is single-shot: `run` consumes it. A failing job, including one
/// whose upload panics, is recorded in the summary and the next job starts.
pub struct BatchWorker {
    batch_id: BatchId,
    uploader: Arc<dyn Uploader>,
    endpoint: String,
    jobs: Vec<TransferJob>,
}

impl BatchWorker {
    pub fn new(
        batch_id: BatchId,
        uploader: Arc<dyn Uploader>,
        endpoint: impl Into<String>,
        jobs: Vec<TransferJob>,
    ) -> Self {
        Self {
            batch_id,
            uploader,
            endpoint: endpoint.into(),
            jobs,
        }
    }

    pub async fn run(self, sink: &dyn ProgressSink) -> BatchSummary {
        let total = self.jobs.len();
        let mut summary = BatchSummary {
            batch_id: self.batch_id,
            success_count: 0,
            failures: Vec::new(),
        };
        transfer_info!(
            "Batch {} started: {} job(s) to {}",
            self.batch_id,
            total,
            self.endpoint
        );

        for (offset, job) in self.jobs.iter().enumerate() {
            sink.emit(EngineEvent::BatchProgress(BatchProgress {
                batch_id: self.batch_id,
                index: offset + 1,
                total,
                title: job.title.clone(),
            }));

            match self.attempt(job).await {
                TransferOutcome::Success => summary.success_count += 1,
                TransferOutcome::Failure { reason } => {
                    transfer_warn!("Batch {}: {:?} failed: {}", self.batch_id, job.title, reason);
                    summary.failures.push(FailedTransfer {
                        title: job.title.clone(),
                        reason,
                    });
                }
            }
        }

        transfer_info!(
            "Batch {} finished: {} sent, {} failed",
            self.batch_id,
            summary.success_count,
            summary.failures.len()
        );
        summary
    }

    async fn attempt(&self, job: &TransferJob) -> TransferOutcome {
        let upload = AssertUnwindSafe(self.uploader.upload(&self.endpoint, job));
        match upload.catch_unwind().await {
            Ok(result) => TransferOutcome::from(result),
            Err(payload) => TransferOutcome::from(Err::<(), _>(FailureKind::unexpected(
                "panic",
                panic_message(payload.as_ref()),
            ))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "upload panicked".to_string()
    }
}
