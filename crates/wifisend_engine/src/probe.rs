use reqwest::StatusCode;
use transfer_logging::{transfer_info, transfer_warn, truncate_for_log};

use crate::client::{build_client, classify_reqwest_error, read_body};
use crate::{ProbeResult, TransferSettings};

#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// GET `endpoint` and report whether it answered 200. Never fails: errors
    /// are folded into the result.
    async fn probe(&self, endpoint: &str) -> ProbeResult;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestProber {
    settings: TransferSettings,
}

impl ReqwestProber {
    pub fn new(settings: TransferSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl Prober for ReqwestProber {
    async fn probe(&self, endpoint: &str) -> ProbeResult {
        let client = match build_client(&self.settings, self.settings.probe_timeout) {
            Ok(client) => client,
            Err(kind) => return unreachable_with(kind.to_string()),
        };

        let response = match client.get(endpoint).send().await {
            Ok(response) => response,
            Err(err) => {
                let kind = classify_reqwest_error(&err);
                transfer_warn!("Probe of {} failed: {}", endpoint, kind);
                return unreachable_with(kind.to_string());
            }
        };

        let status = response.status();
        let body = read_body(response).await;
        transfer_info!(
            "Probe of {}: status={} body={:?}",
            endpoint,
            status.as_u16(),
            truncate_for_log(&body, self.settings.log_body_limit)
        );

        ProbeResult {
            reachable: status == StatusCode::OK,
            status_code: Some(status.as_u16()),
            body,
            error: None,
        }
    }
}

fn unreachable_with(error: String) -> ProbeResult {
    ProbeResult {
        reachable: false,
        status_code: None,
        body: String::new(),
        error: Some(error),
    }
}
