use crate::{BatchReport, ProbeReport, ProgressEvent, RunState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A background task is already running; the request was dropped.
    Busy { running: RunState },
    AddressRequired,
    InvalidAddress(String),
    NothingSelected,
}

/// A notice plus a sequence number, so two identical notices in a row are
/// still told apart by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub seq: u64,
    pub notice: Notice,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub run_state: RunState,
    pub address_input: String,
    pub endpoint: String,
    pub persisted_endpoint: Option<String>,
    pub progress: Option<ProgressEvent>,
    pub last_probe: Option<ProbeReport>,
    pub last_report: Option<BatchReport>,
    pub notice: Option<NoticeView>,
    pub dirty: bool,
}
