use std::path::PathBuf;
use std::sync::Once;

use pretty_assertions::assert_eq;
use wifisend_core::{
    update, AppState, BatchResult, Effect, FailedItem, Job, Msg, Notice, ProgressEvent,
    ReportFlavor, RunState, Selection,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(transfer_logging::initialize_for_tests);
}

fn job(title: &str) -> Job {
    Job {
        title: title.to_string(),
        source_path: PathBuf::from(format!("/library/{title}.epub")),
    }
}

fn selection(jobs: Vec<Job>, preflight_failures: Vec<FailedItem>) -> Selection {
    Selection {
        selected: jobs.len() + preflight_failures.len(),
        jobs,
        preflight_failures,
    }
}

fn progress(index: usize, total: usize, title: &str) -> ProgressEvent {
    ProgressEvent {
        index,
        total,
        title: title.to_string(),
    }
}

fn start_batch(state: AppState, selection: Selection) -> (AppState, u64, Vec<Job>) {
    let (state, effects) = update(state, Msg::SendRequested(selection));
    match effects.as_slice() {
        [Effect::StartTransfer { batch_id, jobs, .. }] => (state, *batch_id, jobs.clone()),
        other => panic!("expected a single StartTransfer, got {other:?}"),
    }
}

#[test]
fn send_starts_transfer_with_surviving_jobs_only() {
    init_logging();
    let (state, batch_id, jobs) = start_batch(
        AppState::new(),
        selection(
            vec![job("Dune"), job("Emma")],
            vec![FailedItem::new("Ulysses", "no EPUB format")],
        ),
    );

    assert_eq!(batch_id, 1);
    assert_eq!(jobs, vec![job("Dune"), job("Emma")]);
    assert_eq!(state.view().run_state, RunState::Transferring);
    assert_eq!(state.active_batch_id(), Some(1));
}

#[test]
fn transfer_effect_carries_normalized_endpoint() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::AddressChanged("10.0.0.5:8080".into()));
    let (_state, effects) = update(state, Msg::SendRequested(selection(vec![job("Dune")], vec![])));

    assert_eq!(
        effects,
        vec![Effect::StartTransfer {
            batch_id: 1,
            endpoint: "http://10.0.0.5:8080".to_string(),
            jobs: vec![job("Dune")],
        }]
    );
}

#[test]
fn send_while_transferring_is_rejected() {
    init_logging();
    let (state, _, _) = start_batch(AppState::new(), selection(vec![job("Dune")], vec![]));
    let (state, effects) =
        update(state, Msg::SendRequested(selection(vec![job("Emma")], vec![])));

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.run_state, RunState::Transferring);
    assert_eq!(state.active_batch_id(), Some(1));
    assert_eq!(
        view.notice.map(|n| n.notice),
        Some(Notice::Busy {
            running: RunState::Transferring
        })
    );
}

#[test]
fn probe_while_transferring_is_rejected() {
    init_logging();
    let (state, _, _) = start_batch(AppState::new(), selection(vec![job("Dune")], vec![]));
    let (state, effects) = update(state, Msg::TestConnectionClicked);

    assert!(effects.is_empty());
    assert_eq!(state.view().run_state, RunState::Transferring);
}

#[test]
fn empty_selection_is_refused() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SendRequested(Selection::default()));

    assert!(effects.is_empty());
    assert_eq!(state.view().run_state, RunState::Idle);
    assert_eq!(
        state.view().notice.map(|n| n.notice),
        Some(Notice::NothingSelected)
    );
}

#[test]
fn all_preflight_failures_complete_immediately() {
    init_logging();
    let failures = vec![
        FailedItem::new("Dune", "no EPUB format"),
        FailedItem::new("Item #4", "catalog lookup failed: gone"),
    ];
    let (state, effects) = update(
        AppState::new(),
        Msg::SendRequested(selection(Vec::new(), failures.clone())),
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.run_state, RunState::Idle);
    let report = view.last_report.expect("report");
    assert_eq!(report.success_count, 0);
    assert_eq!(report.total, 2);
    assert_eq!(report.failures, failures);
    assert_eq!(report.flavor(), ReportFlavor::Failure);
}

#[test]
fn progress_is_applied_in_increasing_order_only() {
    init_logging();
    let (state, batch_id, _) = start_batch(
        AppState::new(),
        selection(vec![job("Dune"), job("Emma")], vec![]),
    );

    let (state, _) = update(
        state,
        Msg::TransferProgress {
            batch_id,
            progress: progress(2, 2, "Emma"),
        },
    );
    assert_eq!(state.view().progress, Some(progress(2, 2, "Emma")));

    // Late or replayed events never move progress backwards.
    let (state, _) = update(
        state,
        Msg::TransferProgress {
            batch_id,
            progress: progress(1, 2, "Dune"),
        },
    );
    assert_eq!(state.view().progress, Some(progress(2, 2, "Emma")));

    // Events for another batch are ignored.
    let (state, _) = update(
        state,
        Msg::TransferProgress {
            batch_id: batch_id + 7,
            progress: progress(3, 3, "Other"),
        },
    );
    assert_eq!(state.view().progress, Some(progress(2, 2, "Emma")));
}

#[test]
fn completion_merges_preflight_failures_first() {
    init_logging();
    let (state, batch_id, _) = start_batch(
        AppState::new(),
        selection(
            vec![job("Dune"), job("Emma")],
            vec![FailedItem::new("Ulysses", "no EPUB format")],
        ),
    );

    let (state, _) = update(
        state,
        Msg::TransferFinished {
            batch_id,
            result: BatchResult {
                success_count: 1,
                failures: vec![FailedItem::new("Emma", "HTTP status 500")],
            },
        },
    );

    let view = state.view();
    assert_eq!(view.run_state, RunState::Idle);
    assert_eq!(view.progress, None);
    let report = view.last_report.expect("report");
    assert_eq!(
        report.failures,
        vec![
            FailedItem::new("Ulysses", "no EPUB format"),
            FailedItem::new("Emma", "HTTP status 500"),
        ]
    );
    assert_eq!(report.success_count + report.failures.len(), report.total);
    assert_eq!(report.flavor(), ReportFlavor::Success);
}

#[test]
fn successful_batch_persists_unsaved_endpoint() {
    init_logging();
    let (state, batch_id, _) = start_batch(AppState::new(), selection(vec![job("Dune")], vec![]));
    let (state, effects) = update(
        state,
        Msg::TransferFinished {
            batch_id,
            result: BatchResult {
                success_count: 1,
                failures: Vec::new(),
            },
        },
    );

    assert_eq!(
        effects,
        vec![Effect::PersistEndpoint {
            endpoint: state.view().endpoint
        }]
    );
}

#[test]
fn address_saved_during_batch_is_not_overwritten_on_completion() {
    init_logging();
    let state = AppState::with_persisted_endpoint("http://10.0.0.1:8080");
    let (state, _) = update(state, Msg::AddressChanged("10.0.0.2:8080".into()));
    let (state, batch_id, _) = start_batch(state, selection(vec![job("Dune")], vec![]));

    let (state, effects) = update(state, Msg::AddressConfigured("10.0.0.3:8080".into()));
    assert_eq!(
        effects,
        vec![Effect::PersistEndpoint {
            endpoint: "http://10.0.0.3:8080".to_string()
        }]
    );

    let (state, effects) = update(
        state,
        Msg::TransferFinished {
            batch_id,
            result: BatchResult {
                success_count: 1,
                failures: Vec::new(),
            },
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.persisted_endpoint.as_deref(), Some("http://10.0.0.3:8080"));
    assert_eq!(view.endpoint, "http://10.0.0.3:8080");
}

#[test]
fn failed_batch_does_not_persist() {
    init_logging();
    let (state, batch_id, _) = start_batch(AppState::new(), selection(vec![job("Dune")], vec![]));
    let (_state, effects) = update(
        state,
        Msg::TransferFinished {
            batch_id,
            result: BatchResult {
                success_count: 0,
                failures: vec![FailedItem::new("Dune", "HTTP status 500")],
            },
        },
    );

    assert!(effects.is_empty());
}

#[test]
fn stale_completion_is_ignored_and_new_batch_can_start() {
    init_logging();
    let (state, batch_id, _) = start_batch(AppState::new(), selection(vec![job("Dune")], vec![]));
    let (state, _) = update(
        state,
        Msg::TransferFinished {
            batch_id: batch_id + 1,
            result: BatchResult::default(),
        },
    );
    assert_eq!(state.view().run_state, RunState::Transferring);

    let (state, _) = update(
        state,
        Msg::TransferFinished {
            batch_id,
            result: BatchResult {
                success_count: 1,
                failures: Vec::new(),
            },
        },
    );
    let (_state, next_batch, _) = start_batch(state, selection(vec![job("Emma")], vec![]));
    assert_eq!(next_batch, batch_id + 1);
}
