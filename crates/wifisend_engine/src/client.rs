use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use crate::FailureKind;

pub const USER_AGENT: &str = concat!("wifisend/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub connect_timeout: Duration,
    /// Per-upload bound; generous enough for multi-megabyte books over WiFi.
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
    pub user_agent: String,
    /// Maximum number of response-body bytes written to the log.
    pub log_body_limit: usize,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(5),
            user_agent: USER_AGENT.to_string(),
            log_body_limit: 512,
        }
    }
}

pub(crate) fn build_client(
    settings: &TransferSettings,
    timeout: Duration,
) -> Result<reqwest::Client, FailureKind> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.clone())
        .connect_timeout(settings.connect_timeout.min(timeout))
        .timeout(timeout)
        .build()
        .map_err(|err| FailureKind::unexpected("client", describe(&err)))
}

/// Sort a transport error into the closed failure taxonomy.
pub(crate) fn classify_reqwest_error(err: &reqwest::Error) -> FailureKind {
    if is_connection_refused(err) {
        return FailureKind::ConnectionRefused;
    }
    if err.is_timeout() {
        return FailureKind::Network(format!("request timed out ({})", describe(err)));
    }
    if err.is_connect() || err.is_request() {
        return FailureKind::Network(describe(err));
    }
    if err.is_builder() {
        return FailureKind::unexpected("request", describe(err));
    }
    FailureKind::unexpected("http", describe(err))
}

/// Collect the buffered response body for diagnostics. Decoding problems are
/// logged and yield an empty string; they never change the outcome.
pub(crate) async fn read_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(text) => text,
        Err(err) => {
            transfer_logging::transfer_warn!("Could not read response body: {}", describe(&err));
            String::new()
        }
    }
}

fn is_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        current = source.source();
    }
    false
}

/// The error followed by its sources, `: `-separated.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        let part = source.to_string();
        if !text.contains(&part) {
            text.push_str(": ");
            text.push_str(&part);
        }
        current = source.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Wrapper(io::Error);

    impl std::fmt::Display for Wrapper {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "client error (Connect)")
        }
    }

    impl StdError for Wrapper {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn refused_is_found_deep_in_the_source_chain() {
        let err = Wrapper(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(is_connection_refused(&err));

        let other = Wrapper(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert!(!is_connection_refused(&other));
    }

    #[test]
    fn describe_joins_sources() {
        let err = Wrapper(io::Error::new(io::ErrorKind::Other, "tcp connect error"));
        assert_eq!(describe(&err), "client error (Connect): tcp connect error");
    }
}
