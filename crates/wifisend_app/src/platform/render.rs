use wifisend_core::{AppViewModel, Notice, ReportFlavor, RunState};

/// Turns view-model changes into terminal lines. Only what changed since the
/// previous view is printed.
#[derive(Debug, Default)]
pub(crate) struct Renderer {
    last: AppViewModel,
}

impl Renderer {
    pub(crate) fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if view.notice != self.last.notice {
            if let Some(notice) = &view.notice {
                lines.push(notice_text(&notice.notice));
            }
        }

        if view.run_state != self.last.run_state {
            match view.run_state {
                RunState::Probing => lines.push(format!("Testing connection to {} ...", view.endpoint)),
                RunState::Transferring => lines.push(format!("Sending to {} ...", view.endpoint)),
                RunState::Idle => {}
            }
        }

        if view.progress != self.last.progress {
            if let Some(progress) = &view.progress {
                lines.push(format!(
                    "[{}/{}] Sending: {}",
                    progress.index, progress.total, progress.title
                ));
            }
        }

        let probe_seq = |view: &AppViewModel| view.last_probe.as_ref().map(|p| p.seq);
        if probe_seq(view) != probe_seq(&self.last) {
            if let Some(probe) = &view.last_probe {
                lines.push(format!(
                    "{} {}",
                    flavor_tag(probe.flavor()),
                    probe.render_text()
                ));
            }
        }

        let batch_id = |view: &AppViewModel| view.last_report.as_ref().map(|r| r.batch_id);
        if batch_id(view) != batch_id(&self.last) {
            if let Some(report) = &view.last_report {
                lines.push(format!(
                    "{} {}",
                    flavor_tag(report.flavor()),
                    report.render_text()
                ));
            }
        }

        if view.persisted_endpoint != self.last.persisted_endpoint {
            if let Some(endpoint) = &view.persisted_endpoint {
                lines.push(format!("Saved address: {endpoint}"));
            }
        }

        self.last = view.clone();
        lines
    }
}

/// Full snapshot for the `status` command.
pub(crate) fn status(view: &AppViewModel) -> Vec<String> {
    let activity = match view.run_state {
        RunState::Idle => "idle",
        RunState::Probing => "testing connection",
        RunState::Transferring => "sending",
    };
    let mut lines = vec![
        format!("Address: {}", view.address_input),
        format!(
            "Saved address: {}",
            view.persisted_endpoint.as_deref().unwrap_or("(not saved)")
        ),
        format!("Activity: {activity}"),
    ];
    if let Some(progress) = &view.progress {
        lines.push(format!(
            "Progress: {}/{} ({})",
            progress.index, progress.total, progress.title
        ));
    }
    if let Some(report) = &view.last_report {
        lines.push(format!("Last transfer: {}", report.render_text()));
    }
    lines
}

fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::Busy {
            running: RunState::Probing,
        } => "Busy: a connection test is still running.".to_string(),
        Notice::Busy { .. } => "Busy: a transfer is still running.".to_string(),
        Notice::AddressRequired => "Please enter the device address.".to_string(),
        Notice::InvalidAddress(reason) => format!("Cannot use that address: {reason}"),
        Notice::NothingSelected => "Select at least one file to send.".to_string(),
    }
}

fn flavor_tag(flavor: ReportFlavor) -> &'static str {
    match flavor {
        ReportFlavor::Success => "[ok]",
        ReportFlavor::Failure => "[failed]",
    }
}
