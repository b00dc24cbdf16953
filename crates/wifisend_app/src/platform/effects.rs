use std::sync::mpsc;
use std::thread;

use transfer_logging::{transfer_debug, transfer_error, transfer_info, transfer_warn};
use wifisend_core::{BatchResult, Effect, FailedItem, Msg, ProbeOutcome, ProgressEvent};
use wifisend_engine::{EngineEvent, EngineHandle, TransferJob};

use super::app::AppEvent;
use super::persistence::SettingsStore;

/// Carries out effects produced by `update`: engine commands and settings
/// writes. Engine results come back as `AppEvent::Msg` on the control channel.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
    store: SettingsStore,
}

impl EffectRunner {
    pub(crate) fn new(
        mut engine: EngineHandle,
        store: SettingsStore,
        app_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        match engine.take_events() {
            Some(events) => spawn_event_forwarder(events, app_tx),
            None => transfer_error!("Engine events were already taken; results will be lost"),
        }
        Self { engine, store }
    }

    pub(crate) fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Runs `effects` in order. Returns lines for the user about effects
    /// that failed locally.
    pub(crate) fn run(&mut self, effects: Vec<Effect>) -> Vec<String> {
        let mut notes = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartProbe { endpoint } => {
                    transfer_info!("StartProbe endpoint={}", endpoint);
                    self.engine.probe(endpoint);
                }
                Effect::StartTransfer {
                    batch_id,
                    endpoint,
                    jobs,
                } => {
                    transfer_info!(
                        "StartTransfer batch_id={} jobs={} endpoint={}",
                        batch_id,
                        jobs.len(),
                        endpoint
                    );
                    let jobs = jobs
                        .into_iter()
                        .map(|job| TransferJob {
                            title: job.title,
                            source_path: job.source_path,
                        })
                        .collect();
                    self.engine.run_batch(batch_id, endpoint, jobs);
                }
                Effect::PersistEndpoint { endpoint } => {
                    if let Err(err) = self.store.set_wifi_address(&endpoint) {
                        transfer_warn!("Could not save wifi_address={}: {}", endpoint, err);
                        notes.push(format!("Could not save the address: {err}"));
                    }
                }
            }
        }
        notes
    }
}

fn spawn_event_forwarder(events: mpsc::Receiver<EngineEvent>, app_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for event in events {
            if app_tx.send(AppEvent::Msg(map_event(event))).is_err() {
                return;
            }
        }
        transfer_debug!("Engine event channel closed");
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::BatchProgress(progress) => Msg::TransferProgress {
            batch_id: progress.batch_id,
            progress: ProgressEvent {
                index: progress.index,
                total: progress.total,
                title: progress.title,
            },
        },
        EngineEvent::BatchCompleted(summary) => Msg::TransferFinished {
            batch_id: summary.batch_id,
            result: BatchResult {
                success_count: summary.success_count,
                failures: summary
                    .failures
                    .into_iter()
                    .map(|failure| FailedItem::new(failure.title, failure.reason))
                    .collect(),
            },
        },
        EngineEvent::ProbeCompleted { endpoint, result } => {
            transfer_debug!("Probe of {} finished: reachable={}", endpoint, result.reachable);
            Msg::ProbeFinished(ProbeOutcome {
                reachable: result.reachable,
                status_code: result.status_code,
                body: result.body,
                error: result.error,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wifisend_engine::{BatchProgress, BatchSummary, FailedTransfer, ProbeResult};

    #[test]
    fn batch_events_map_onto_core_messages() {
        let progress = map_event(EngineEvent::BatchProgress(BatchProgress {
            batch_id: 4,
            index: 2,
            total: 3,
            title: "Emma".to_string(),
        }));
        assert_eq!(
            progress,
            Msg::TransferProgress {
                batch_id: 4,
                progress: ProgressEvent {
                    index: 2,
                    total: 3,
                    title: "Emma".to_string(),
                },
            }
        );

        let finished = map_event(EngineEvent::BatchCompleted(BatchSummary {
            batch_id: 4,
            success_count: 2,
            failures: vec![FailedTransfer {
                title: "Emma".to_string(),
                reason: "HTTP status 500".to_string(),
            }],
        }));
        assert_eq!(
            finished,
            Msg::TransferFinished {
                batch_id: 4,
                result: BatchResult {
                    success_count: 2,
                    failures: vec![FailedItem::new("Emma", "HTTP status 500")],
                },
            }
        );
    }

    #[test]
    fn probe_result_keeps_every_field() {
        let msg = map_event(EngineEvent::ProbeCompleted {
            endpoint: "http://10.0.0.2:8080".to_string(),
            result: ProbeResult {
                reachable: false,
                status_code: Some(404),
                body: "not here".to_string(),
                error: None,
            },
        });
        assert_eq!(
            msg,
            Msg::ProbeFinished(ProbeOutcome {
                reachable: false,
                status_code: Some(404),
                body: "not here".to_string(),
                error: None,
            })
        );
    }
}
