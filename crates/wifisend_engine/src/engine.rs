use std::sync::{mpsc, Arc};
use std::thread;

use transfer_logging::{transfer_debug, transfer_warn};

use crate::probe::{Prober, ReqwestProber};
use crate::upload::{ReqwestUploader, Uploader};
use crate::worker::{BatchWorker, ChannelProgressSink};
use crate::{BatchId, EngineEvent, TransferJob, TransferSettings};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start the transfer engine: {0}")]
    Startup(#[from] std::io::Error),
}

enum EngineCommand {
    Probe {
        endpoint: String,
    },
    RunBatch {
        batch_id: BatchId,
        endpoint: String,
        jobs: Vec<TransferJob>,
    },
}

/// Background side of a session: a dedicated thread driving a tokio runtime.
///
/// Commands are queued from the control thread; results come back as
/// [`EngineEvent`]s on a channel. The engine never looks at session state, it
/// only sees what each command carries.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Option<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(settings: TransferSettings) -> Result<Self, EngineError> {
        let uploader: Arc<dyn Uploader> = Arc::new(ReqwestUploader::new(settings.clone()));
        let prober: Arc<dyn Prober> = Arc::new(ReqwestProber::new(settings));
        Self::with_transport(uploader, prober)
    }

    pub fn with_transport(
        uploader: Arc<dyn Uploader>,
        prober: Arc<dyn Prober>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("wifisend-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let uploader = uploader.clone();
                    let prober = prober.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(uploader, prober.as_ref(), command, event_tx).await;
                    });
                }
                transfer_debug!("Engine command channel closed; shutting down");
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Some(event_rx),
        })
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<EngineEvent>> {
        self.event_rx.take()
    }

    pub fn probe(&self, endpoint: impl Into<String>) {
        self.send(EngineCommand::Probe {
            endpoint: endpoint.into(),
        });
    }

    pub fn run_batch(&self, batch_id: BatchId, endpoint: impl Into<String>, jobs: Vec<TransferJob>) {
        self.send(EngineCommand::RunBatch {
            batch_id,
            endpoint: endpoint.into(),
            jobs,
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            transfer_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    uploader: Arc<dyn Uploader>,
    prober: &dyn Prober,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Probe { endpoint } => {
            let result = prober.probe(&endpoint).await;
            let _ = event_tx.send(EngineEvent::ProbeCompleted { endpoint, result });
        }
        EngineCommand::RunBatch {
            batch_id,
            endpoint,
            jobs,
        } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let summary = BatchWorker::new(batch_id, uploader, endpoint, jobs)
                .run(&sink)
                .await;
            let _ = event_tx.send(EngineEvent::BatchCompleted(summary));
        }
    }
}
