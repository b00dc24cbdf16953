use std::sync::mpsc;

use anyhow::Context;
use transfer_logging::{transfer_info, transfer_warn};
use wifisend_core::{
    resolve_selection, update, AppState, AppViewModel, Msg, RunState, TRANSFER_FORMAT,
};
use wifisend_engine::{EngineHandle, TransferSettings};

use super::catalog::FileCatalog;
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::persistence::SettingsStore;
use super::render::{self, Renderer};
use super::shell::{self, ShellCommand, HELP};

/// Everything the control loop reacts to.
#[derive(Debug)]
pub(crate) enum AppEvent {
    Msg(Msg),
    Shell(ShellCommand),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::from_env());

    let store = SettingsStore::load(SettingsStore::default_path());
    let state = match store.get_wifi_address() {
        Some(stored) => AppState::with_persisted_endpoint(stored),
        None => AppState::new(),
    };
    transfer_info!(
        "Starting with endpoint {} (settings at {:?})",
        state.view().endpoint,
        store.path()
    );

    let engine = EngineHandle::new(TransferSettings::default())
        .context("could not start the transfer engine")?;
    let (app_tx, app_rx) = mpsc::channel();
    let runner = EffectRunner::new(engine, store, app_tx.clone());
    shell::spawn_stdin_reader(app_tx);

    let mut control = ControlLoop::new(state, runner);
    control.greet();
    control.run(app_rx);
    Ok(())
}

struct ControlLoop {
    state: Option<AppState>,
    runner: EffectRunner,
    renderer: Renderer,
    quitting: bool,
}

impl ControlLoop {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self {
            state: Some(state),
            runner,
            renderer: Renderer::default(),
            quitting: false,
        }
    }

    fn greet(&mut self) {
        let view = self.view();
        print_lines([
            format!("wifisend: sending to {}", view.endpoint),
            format!("Settings file: {}", self.runner.store().path().display()),
            "Type help for commands.".to_string(),
        ]);
        self.renderer.render(&view);
    }

    fn run(&mut self, events: mpsc::Receiver<AppEvent>) {
        while let Ok(event) = events.recv() {
            match event {
                AppEvent::Msg(msg) => self.dispatch(msg),
                AppEvent::Shell(command) => self.handle_command(command),
                AppEvent::InputClosed => self.quitting = true,
            }
            if self.quitting {
                if self.run_state() == RunState::Idle {
                    break;
                }
                transfer_info!("Quit requested; waiting for {:?} to finish", self.run_state());
            }
        }
        transfer_info!("Control loop finished");
    }

    fn handle_command(&mut self, command: ShellCommand) {
        match command {
            ShellCommand::Input(msg) => self.dispatch(msg),
            ShellCommand::Send(paths) => {
                let selection = resolve_selection(&FileCatalog::new(paths), TRANSFER_FORMAT);
                self.dispatch(Msg::SendRequested(selection));
            }
            ShellCommand::Status => print_lines(render::status(&self.view())),
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => {
                self.quitting = true;
                if self.run_state() != RunState::Idle {
                    println!("Waiting for the running task to finish...");
                }
            }
            ShellCommand::Invalid(reason) => println!("{reason}"),
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let Some(state) = self.state.take() else {
            transfer_warn!("State missing; message dropped");
            return;
        };
        let (mut state, effects) = update(state, msg);
        let changed = state.consume_dirty();
        let view = state.view();
        self.state = Some(state);

        let notes = self.runner.run(effects);
        if changed {
            print_lines(self.renderer.render(&view));
        }
        print_lines(notes);
    }

    fn view(&self) -> AppViewModel {
        self.state.as_ref().map(AppState::view).unwrap_or_default()
    }

    fn run_state(&self) -> RunState {
        self.state
            .as_ref()
            .map_or(RunState::Idle, AppState::run_state)
    }
}

fn print_lines(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        println!("{line}");
    }
}
