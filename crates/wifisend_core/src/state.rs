use crate::endpoint::{normalize_endpoint, EndpointError, DEFAULT_ENDPOINT};
use crate::view_model::{AppViewModel, Notice, NoticeView};
use crate::{
    BatchId, BatchReport, BatchResult, FailedItem, Job, ProbeOutcome, ProbeReport, ProgressEvent,
    Selection,
};

/// What the session is doing in the background. At most one task at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Probing,
    Transferring,
}

/// Where a background task was started: the endpoint it runs against and the
/// stored address at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaskOrigin {
    pub(crate) endpoint: String,
    pub(crate) persisted_at_start: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveBatch {
    batch_id: BatchId,
    origin: TaskOrigin,
    total_selected: usize,
    preflight_failures: Vec<FailedItem>,
    progress: Option<ProgressEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    address_input: String,
    endpoint: String,
    persisted_endpoint: Option<String>,
    run_state: RunState,
    next_batch_id: BatchId,
    active_batch: Option<ActiveBatch>,
    probe_origin: Option<TaskOrigin>,
    probe_seq: u64,
    last_probe: Option<ProbeReport>,
    last_report: Option<BatchReport>,
    notice_seq: u64,
    notice: Option<NoticeView>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Fresh session pointing at the factory default address; nothing has
    /// been persisted yet.
    pub fn new() -> Self {
        Self {
            address_input: DEFAULT_ENDPOINT.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            persisted_endpoint: None,
            run_state: RunState::Idle,
            next_batch_id: 1,
            active_batch: None,
            probe_origin: None,
            probe_seq: 0,
            last_probe: None,
            last_report: None,
            notice_seq: 0,
            notice: None,
            dirty: false,
        }
    }

    /// Session started from a stored `wifi_address`. The stored text is kept
    /// verbatim as the persisted value so a later successful use can write
    /// back its normalized form.
    pub fn with_persisted_endpoint(stored: &str) -> Self {
        let mut state = Self::new();
        let endpoint =
            normalize_endpoint(stored).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        state.address_input = endpoint.clone();
        state.endpoint = endpoint;
        state.persisted_endpoint = Some(stored.trim().to_string());
        state
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            run_state: self.run_state,
            address_input: self.address_input.clone(),
            endpoint: self.endpoint.clone(),
            persisted_endpoint: self.persisted_endpoint.clone(),
            progress: self
                .active_batch
                .as_ref()
                .and_then(|batch| batch.progress.clone()),
            last_probe: self.last_probe.clone(),
            last_report: self.last_report.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn active_batch_id(&self) -> Option<BatchId> {
        self.active_batch.as_ref().map(|batch| batch.batch_id)
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_address_input(&mut self, text: String) {
        if self.address_input != text {
            self.address_input = text;
            self.mark_dirty();
        }
    }

    /// Normalize the address field and make it the endpoint in use.
    pub(crate) fn read_endpoint(&mut self) -> Result<String, EndpointError> {
        let endpoint = normalize_endpoint(&self.address_input)?;
        self.address_input = endpoint.clone();
        self.endpoint = endpoint.clone();
        self.mark_dirty();
        Ok(endpoint)
    }

    pub(crate) fn raise(&mut self, notice: Notice) {
        self.notice_seq += 1;
        self.notice = Some(NoticeView {
            seq: self.notice_seq,
            notice,
        });
        self.mark_dirty();
    }

    pub(crate) fn raise_endpoint_error(&mut self, err: EndpointError) {
        match err {
            EndpointError::Empty => self.raise(Notice::AddressRequired),
            other => self.raise(Notice::InvalidAddress(other.to_string())),
        }
    }

    /// True when `endpoint` differs from what the settings store holds.
    pub(crate) fn needs_persist(&self, endpoint: &str) -> bool {
        self.persisted_endpoint.as_deref() != Some(endpoint)
    }

    /// True when the stored address is still what it was when the task
    /// started, i.e. the user did not save another one meanwhile.
    pub(crate) fn persisted_unchanged_since(&self, origin: &TaskOrigin) -> bool {
        self.persisted_endpoint == origin.persisted_at_start
    }

    fn origin_for(&self, endpoint: String) -> TaskOrigin {
        TaskOrigin {
            endpoint,
            persisted_at_start: self.persisted_endpoint.clone(),
        }
    }

    pub(crate) fn mark_persisted(&mut self, endpoint: String) {
        self.persisted_endpoint = Some(endpoint);
        self.mark_dirty();
    }

    pub(crate) fn start_probe(&mut self, endpoint: String) {
        self.run_state = RunState::Probing;
        self.probe_origin = Some(self.origin_for(endpoint));
        self.mark_dirty();
    }

    /// Records a probe result. Returns where the probe was started, or
    /// `None` when no probe was in flight.
    pub(crate) fn finish_probe(&mut self, outcome: ProbeOutcome) -> Option<TaskOrigin> {
        if self.run_state != RunState::Probing {
            return None;
        }
        let origin = self.probe_origin.take()?;
        self.run_state = RunState::Idle;
        self.probe_seq += 1;
        self.last_probe = Some(ProbeReport {
            seq: self.probe_seq,
            endpoint: origin.endpoint.clone(),
            outcome,
        });
        self.mark_dirty();
        Some(origin)
    }

    fn allocate_batch_id(&mut self) -> BatchId {
        let id = self.next_batch_id;
        self.next_batch_id += 1;
        id
    }

    /// Starts a batch from a resolved selection.
    ///
    /// When every entry already failed pre-flight, the report is produced
    /// immediately and `None` is returned: there is nothing for a worker to do.
    pub(crate) fn begin_batch(
        &mut self,
        selection: Selection,
        endpoint: String,
    ) -> Option<(BatchId, Vec<Job>)> {
        let batch_id = self.allocate_batch_id();
        self.mark_dirty();

        if selection.jobs.is_empty() {
            self.last_report = Some(BatchReport {
                batch_id,
                total: selection.selected,
                success_count: 0,
                failures: selection.preflight_failures,
            });
            return None;
        }

        self.run_state = RunState::Transferring;
        let origin = self.origin_for(endpoint);
        self.active_batch = Some(ActiveBatch {
            batch_id,
            origin,
            total_selected: selection.selected,
            preflight_failures: selection.preflight_failures,
            progress: None,
        });
        Some((batch_id, selection.jobs))
    }

    pub(crate) fn apply_progress(&mut self, batch_id: BatchId, progress: ProgressEvent) {
        let Some(batch) = self.active_batch.as_mut() else {
            return;
        };
        if batch.batch_id != batch_id || progress.index == 0 || progress.index > progress.total {
            return;
        }
        let last_index = batch.progress.as_ref().map_or(0, |p| p.index);
        if progress.index <= last_index {
            return;
        }
        batch.progress = Some(progress);
        self.mark_dirty();
    }

    /// Merges pre-flight failures (first) with worker failures (second).
    /// Returns where the batch was started and its success count, or `None`
    /// for a batch that is not the active one.
    pub(crate) fn finish_batch(
        &mut self,
        batch_id: BatchId,
        result: BatchResult,
    ) -> Option<(TaskOrigin, usize)> {
        if self.active_batch_id() != Some(batch_id) {
            return None;
        }
        let batch = self.active_batch.take()?;
        self.run_state = RunState::Idle;

        let success_count = result.success_count;
        let mut failures = batch.preflight_failures;
        failures.extend(result.failures);
        self.last_report = Some(BatchReport {
            batch_id,
            total: batch.total_selected,
            success_count,
            failures,
        });
        self.mark_dirty();
        Some((batch.origin, success_count))
    }
}
