#![deny(missing_docs)]
//! Shared logging utilities for the transfer workspace.
//!
//! This crate provides the `transfer_*` logging macros used across the
//! codebase, a helper for bounding diagnostic payloads, and a minimal test
//! initializer for the global logger.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! transfer_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! transfer_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! transfer_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! transfer_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! transfer_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Returns at most `limit` bytes of `text`, cut back to a char boundary.
///
/// Response bodies are logged for diagnostics only; this keeps a chatty
/// device from flooding the log.
pub fn truncate_for_log(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::truncate_for_log;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_for_log("ok", 10), "ok");
    }

    #[test]
    fn long_text_is_cut_on_char_boundary() {
        // "é" is two bytes; a cut at 2 would split it.
        assert_eq!(truncate_for_log("aéb", 2), "a");
        assert_eq!(truncate_for_log("abcdef", 3), "abc");
    }
}
