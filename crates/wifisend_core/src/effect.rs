use crate::{BatchId, Job};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run a reachability check against `endpoint` in the background.
    StartProbe { endpoint: String },
    /// Hand `jobs` to a fresh batch worker.
    StartTransfer {
        batch_id: BatchId,
        endpoint: String,
        jobs: Vec<Job>,
    },
    /// Write `endpoint` to the settings store under `wifi_address`.
    PersistEndpoint { endpoint: String },
}
