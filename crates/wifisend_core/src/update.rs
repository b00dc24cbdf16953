use crate::state::TaskOrigin;
use crate::{AppState, Effect, Msg, Notice, RunState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AddressChanged(text) => {
            state.set_address_input(text);
            Vec::new()
        }
        Msg::TestConnectionClicked => {
            // One background task per session: a probe cannot start while a
            // batch is running either.
            if state.run_state() != RunState::Idle {
                state.raise(Notice::Busy {
                    running: state.run_state(),
                });
                return (state, Vec::new());
            }
            match state.read_endpoint() {
                Ok(endpoint) => {
                    state.start_probe(endpoint.clone());
                    vec![Effect::StartProbe { endpoint }]
                }
                Err(err) => {
                    state.raise_endpoint_error(err);
                    Vec::new()
                }
            }
        }
        Msg::SaveSettingsClicked => save_endpoint(&mut state),
        Msg::AddressConfigured(text) => {
            state.set_address_input(text);
            save_endpoint(&mut state)
        }
        Msg::SendRequested(selection) => {
            if state.run_state() != RunState::Idle {
                state.raise(Notice::Busy {
                    running: state.run_state(),
                });
                return (state, Vec::new());
            }
            if selection.is_empty() {
                state.raise(Notice::NothingSelected);
                return (state, Vec::new());
            }
            let endpoint = match state.read_endpoint() {
                Ok(endpoint) => endpoint,
                Err(err) => {
                    state.raise_endpoint_error(err);
                    return (state, Vec::new());
                }
            };
            match state.begin_batch(selection, endpoint.clone()) {
                Some((batch_id, jobs)) => vec![Effect::StartTransfer {
                    batch_id,
                    endpoint,
                    jobs,
                }],
                None => Vec::new(),
            }
        }
        Msg::ProbeFinished(outcome) => {
            let reachable = outcome.reachable;
            match state.finish_probe(outcome) {
                Some(origin) if reachable => persist_if_changed(&mut state, origin),
                _ => Vec::new(),
            }
        }
        Msg::TransferProgress { batch_id, progress } => {
            state.apply_progress(batch_id, progress);
            Vec::new()
        }
        Msg::TransferFinished { batch_id, result } => match state.finish_batch(batch_id, result) {
            Some((origin, success_count)) if success_count > 0 => {
                persist_if_changed(&mut state, origin)
            }
            _ => Vec::new(),
        },
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn save_endpoint(state: &mut AppState) -> Vec<Effect> {
    match state.read_endpoint() {
        Ok(endpoint) => {
            state.mark_persisted(endpoint.clone());
            vec![Effect::PersistEndpoint { endpoint }]
        }
        Err(err) => {
            state.raise_endpoint_error(err);
            Vec::new()
        }
    }
}

/// First successful use of an address the store does not hold yet writes it
/// back, unless the user saved an address while the task was running.
fn persist_if_changed(state: &mut AppState, origin: TaskOrigin) -> Vec<Effect> {
    if !state.persisted_unchanged_since(&origin) || !state.needs_persist(&origin.endpoint) {
        return Vec::new();
    }
    let endpoint = origin.endpoint;
    state.mark_persisted(endpoint.clone());
    vec![Effect::PersistEndpoint { endpoint }]
}
