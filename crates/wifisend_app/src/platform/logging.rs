//! Logging setup for the wifisend binary.
//!
//! Logs go to `./wifisend.log` by default. `WIFISEND_LOG` selects
//! `file`, `terminal` or `both`.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./wifisend.log";
const LOG_DESTINATION_ENV: &str = "WIFISEND_LOG";

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogDestination {
    /// Write to ./wifisend.log in the current directory.
    File,
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

impl LogDestination {
    pub(crate) fn from_env() -> Self {
        std::env::var(LOG_DESTINATION_ENV)
            .ok()
            .and_then(|value| Self::parse(&value))
            .unwrap_or(LogDestination::File)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Some(LogDestination::File),
            "terminal" | "term" => Some(LogDestination::Terminal),
            "both" => Some(LogDestination::Both),
            _ => None,
        }
    }
}

/// Installs the global logger. Safe to call once per process; later calls
/// are ignored by `log`.
pub(crate) fn initialize(destination: LogDestination) {
    let level = LevelFilter::Info;
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => match create_file_logger(level, config) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => vec![TermLogger::new(
            level,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )],
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from(LOG_FILE);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_names_are_case_insensitive() {
        assert_eq!(LogDestination::parse("Both"), Some(LogDestination::Both));
        assert_eq!(LogDestination::parse(" terminal "), Some(LogDestination::Terminal));
        assert_eq!(LogDestination::parse("FILE"), Some(LogDestination::File));
        assert_eq!(LogDestination::parse("syslog"), None);
    }
}
