//! WiFi Send core: pure session state machine and view-model helpers.
mod catalog;
mod effect;
mod endpoint;
mod msg;
mod report;
mod state;
mod types;
mod update;
mod view_model;

pub use catalog::{resolve_selection, Catalog, CatalogError, ItemId, Selection, TRANSFER_FORMAT};
pub use effect::Effect;
pub use endpoint::{normalize_endpoint, EndpointError, DEFAULT_ENDPOINT};
pub use msg::Msg;
pub use report::{BatchReport, ProbeReport, ReportFlavor};
pub use state::{AppState, RunState};
pub use types::{BatchId, BatchResult, FailedItem, Job, ProbeOutcome, ProgressEvent};
pub use update::update;
pub use view_model::{AppViewModel, Notice, NoticeView};
