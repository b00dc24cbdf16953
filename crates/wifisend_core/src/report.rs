use std::fmt::Write as _;

use crate::{BatchId, FailedItem, ProbeOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFlavor {
    Success,
    Failure,
}

/// End-of-batch summary shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub batch_id: BatchId,
    /// Items originally selected, including those rejected before upload.
    pub total: usize,
    pub success_count: usize,
    pub failures: Vec<FailedItem>,
}

impl BatchReport {
    /// A batch with at least one delivered item reads as a success, even
    /// when some items failed.
    pub fn flavor(&self) -> ReportFlavor {
        if self.success_count > 0 {
            ReportFlavor::Success
        } else {
            ReportFlavor::Failure
        }
    }

    pub fn render_text(&self) -> String {
        let mut text = format!(
            "Sent {} of {} item(s).",
            self.success_count, self.total
        );
        if !self.failures.is_empty() {
            text.push_str("\n\nFailed items:");
            for item in &self.failures {
                let _ = write!(text, "\n• {}: {}", item.title, item.reason);
            }
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub seq: u64,
    pub endpoint: String,
    pub outcome: ProbeOutcome,
}

impl ProbeReport {
    pub fn flavor(&self) -> ReportFlavor {
        if self.outcome.reachable {
            ReportFlavor::Success
        } else {
            ReportFlavor::Failure
        }
    }

    pub fn render_text(&self) -> String {
        if self.outcome.reachable {
            return format!("Connected to {}.", self.endpoint);
        }
        if let Some(error) = &self.outcome.error {
            return format!("Connection to {} failed: {}", self.endpoint, error);
        }
        let status = self
            .outcome
            .status_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "Connection to {} failed.\nStatus code: {}\nResponse: {}",
            self.endpoint, status, self.outcome.body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(success_count: usize, failures: Vec<FailedItem>) -> BatchReport {
        BatchReport {
            batch_id: 1,
            total: success_count + failures.len(),
            success_count,
            failures,
        }
    }

    #[test]
    fn clean_batch_has_no_failure_section() {
        let report = report(2, Vec::new());
        assert_eq!(report.render_text(), "Sent 2 of 2 item(s).");
        assert_eq!(report.flavor(), ReportFlavor::Success);
    }

    #[test]
    fn partial_batch_lists_failures_and_stays_successful() {
        let report = report(1, vec![FailedItem::new("Dune", "no EPUB format")]);
        assert_eq!(
            report.render_text(),
            "Sent 1 of 2 item(s).\n\nFailed items:\n• Dune: no EPUB format"
        );
        assert_eq!(report.flavor(), ReportFlavor::Success);
    }

    #[test]
    fn batch_without_successes_reads_as_failure() {
        let report = report(0, vec![FailedItem::new("Emma", "HTTP status 500")]);
        assert_eq!(report.flavor(), ReportFlavor::Failure);
    }

    #[test]
    fn unreachable_probe_shows_status_and_body() {
        let report = ProbeReport {
            seq: 1,
            endpoint: "http://10.0.0.2:8080".to_string(),
            outcome: ProbeOutcome {
                reachable: false,
                status_code: Some(404),
                body: "nope".to_string(),
                error: None,
            },
        };
        assert_eq!(report.flavor(), ReportFlavor::Failure);
        assert_eq!(
            report.render_text(),
            "Connection to http://10.0.0.2:8080 failed.\nStatus code: 404\nResponse: nope"
        );
    }
}
