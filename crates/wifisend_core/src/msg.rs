#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the address field.
    AddressChanged(String),
    /// User asked for a connectivity test of the current address.
    TestConnectionClicked,
    /// User asked to persist the current address.
    SaveSettingsClicked,
    /// User entered a new address through the configure prompt; applied and persisted at once.
    AddressConfigured(String),
    /// User asked to send the current selection. Pre-flight resolution has already run.
    SendRequested(crate::Selection),
    /// Engine finished a probe.
    ProbeFinished(crate::ProbeOutcome),
    /// Engine is about to upload a job of the given batch.
    TransferProgress {
        batch_id: crate::BatchId,
        progress: crate::ProgressEvent,
    },
    /// Engine finished every job of the given batch.
    TransferFinished {
        batch_id: crate::BatchId,
        result: crate::BatchResult,
    },
    /// Control loop tick.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
