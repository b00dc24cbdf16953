//! Terminal front end: shell input, settings, logging and the bridge between
//! the core state machine and the transfer engine.
mod app;
mod catalog;
mod effects;
mod logging;
mod persistence;
mod render;
mod shell;

pub use app::run_app;
