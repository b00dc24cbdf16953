//! WiFi Send engine: multipart upload protocol, probing and the batch worker.
mod client;
mod engine;
mod multipart;
mod probe;
mod types;
mod upload;
mod worker;

pub use client::{TransferSettings, USER_AGENT};
pub use engine::{EngineError, EngineHandle};
pub use multipart::{guess_content_type, MultipartBody, DEFAULT_CONTENT_TYPE, FIELD_NAME};
pub use probe::{Prober, ReqwestProber};
pub use types::{
    BatchId, BatchProgress, BatchSummary, EngineEvent, FailedTransfer, FailureKind, ProbeResult,
    TransferJob, TransferOutcome,
};
pub use upload::{ReqwestUploader, Uploader};
pub use worker::{BatchWorker, ChannelProgressSink, ProgressSink};
