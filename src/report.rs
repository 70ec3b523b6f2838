use chrono::Local;
use tracing::{error, info, warn, Level};

use crate::address::MonitorTarget;
use crate::models::{AlertEvent, AlertStyle, ProbeResult, Status};
use crate::state::Observation;
use crate::utils::strip_indentation;

pub const ALERT_TITLE: &str = "PART OR ALL OF SERVER DOWN";

/// Renders status snapshots and decides when an alert must fire. Pure
/// formatting; delivery belongs to the notifier chain.
pub struct StatusReporter {
    use_friendly_names: bool,
    alert_on_error: bool,
    alert_style: AlertStyle,
}

impl StatusReporter {
    pub fn new(use_friendly_names: bool, alert_on_error: bool, alert_style: AlertStyle) -> Self {
        Self {
            use_friendly_names,
            alert_on_error,
            alert_style,
        }
    }

    /// Builds the human-readable snapshot for one observed poll, plus the
    /// alert to deliver when the stack is down and alerting is enabled.
    pub fn render(
        &self,
        target: &MonitorTarget,
        probe: &ProbeResult,
        observation: &Observation,
    ) -> (String, Option<AlertEvent>) {
        let port = target.active_port();
        let snapshot = format!(
            "\t{timestamp}: System Status on port {port} is:\n\
             \t\tLocal machine is: {local}\n\
             \t\tMachine is: {machine}\n\
             \t\tServer: '{server}' on\n\
             \t\tPort: {port} is {server_status}.\n\
             \t\tPage: '{page}' is {page_status}",
            timestamp = Local::now().format("%c"),
            local = Status::from(probe.local_network_up),
            machine = Status::from(probe.machine_up),
            server = target.server_label(self.use_friendly_names),
            server_status = Status::from(probe.server_up),
            page = page_label(target, probe),
            page_status = Status::from(probe.page_up),
        );

        let alert = (observation.is_down && self.alert_on_error).then(|| AlertEvent {
            title: ALERT_TITLE.to_string(),
            body: strip_indentation(&snapshot),
            style: self.alert_style,
        });

        (snapshot, alert)
    }

    /// Logs the snapshot at a severity derived from the server and page
    /// layers: healthy polls are informational, a dead page on a live
    /// server warns, a dead server is an error.
    pub fn log_status(&self, snapshot: &str, probe: &ProbeResult) {
        let level = severity(probe);
        if level == Level::ERROR {
            error!("{snapshot}");
        } else if level == Level::WARN {
            warn!("{snapshot}");
        } else {
            info!("{snapshot}");
        }
    }
}

pub fn severity(probe: &ProbeResult) -> Level {
    if !probe.server_up {
        Level::ERROR
    } else if !probe.page_up {
        Level::WARN
    } else {
        Level::INFO
    }
}

/// Display label for the page: the explicit page segment when configured,
/// else the served HTML title, else "Homepage".
fn page_label<'a>(target: &'a MonitorTarget, probe: &'a ProbeResult) -> &'a str {
    let page = target.page_path();
    if !page.is_empty() {
        return page;
    }
    probe.html_title.as_deref().unwrap_or("Homepage")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AvailabilityState;
    use std::collections::HashMap;

    fn target() -> MonitorTarget {
        let mut names = HashMap::new();
        names.insert(80, "Apache".to_string());
        MonitorTarget::new("http://10.56.211.116/", vec![80, 8000], None, names).unwrap()
    }

    fn observe(probe: &ProbeResult) -> Observation {
        AvailabilityState::new().observe(probe)
    }

    #[test]
    fn snapshot_lists_every_layer() {
        let reporter = StatusReporter::new(true, true, AlertStyle::ErrorTopmost);
        let probe = ProbeResult::all_up();
        let (snapshot, _) = reporter.render(&target(), &probe, &observe(&probe));
        assert!(snapshot.contains("System Status on port 80"));
        assert!(snapshot.to_lowercase().contains("local machine is:"));
        assert!(snapshot.contains("Machine is: UP"));
        assert!(snapshot.contains("Server: 'Apache' on"));
        assert!(snapshot.contains("Port: 80 is UP."));
        assert!(snapshot.contains("Page: 'Homepage' is UP"));
    }

    #[test]
    fn all_up_produces_no_alert() {
        let reporter = StatusReporter::new(true, true, AlertStyle::ErrorTopmost);
        let probe = ProbeResult::all_up();
        let (_, alert) = reporter.render(&target(), &probe, &observe(&probe));
        assert!(alert.is_none());
    }

    #[test]
    fn down_stack_produces_alert_with_stripped_body() {
        let reporter = StatusReporter::new(true, true, AlertStyle::ErrorTopmost);
        let probe = ProbeResult {
            server_up: false,
            page_up: false,
            ..ProbeResult::all_up()
        };
        let (snapshot, alert) = reporter.render(&target(), &probe, &observe(&probe));
        let alert = alert.expect("down stack must alert");
        assert_eq!(alert.title, ALERT_TITLE);
        assert!(!alert.body.contains('\t'));
        assert_eq!(alert.body, strip_indentation(&snapshot));
        assert_eq!(alert.style, AlertStyle::ErrorTopmost);
    }

    #[test]
    fn alerting_disabled_suppresses_the_event() {
        let reporter = StatusReporter::new(true, false, AlertStyle::ErrorTopmost);
        let probe = ProbeResult::default();
        let (_, alert) = reporter.render(&target(), &probe, &observe(&probe));
        assert!(alert.is_none());
    }

    #[test]
    fn served_title_names_the_page() {
        let reporter = StatusReporter::new(true, true, AlertStyle::ErrorTopmost);
        let probe = ProbeResult {
            html_title: Some("Site Administration".into()),
            ..ProbeResult::all_up()
        };
        let (snapshot, _) = reporter.render(&target(), &probe, &observe(&probe));
        assert!(snapshot.contains("Page: 'Site Administration' is UP"));
    }

    #[test]
    fn explicit_page_beats_served_title() {
        let reporter = StatusReporter::new(true, true, AlertStyle::ErrorTopmost);
        let t = MonitorTarget::new(
            "http://10.56.211.116/",
            vec![80],
            Some("admin".into()),
            HashMap::new(),
        )
        .unwrap();
        let probe = ProbeResult {
            html_title: Some("Ignored".into()),
            ..ProbeResult::all_up()
        };
        let (snapshot, _) = reporter.render(&t, &probe, &observe(&probe));
        assert!(snapshot.contains("Page: 'admin' is UP"));
    }

    #[test]
    fn raw_address_is_used_when_friendly_names_are_off() {
        let reporter = StatusReporter::new(false, true, AlertStyle::ErrorTopmost);
        let probe = ProbeResult::all_up();
        let (snapshot, _) = reporter.render(&target(), &probe, &observe(&probe));
        assert!(snapshot.contains("Server: 'http://10.56.211.116/' on"));
    }

    #[test]
    fn severity_tiers_follow_server_and_page() {
        assert_eq!(severity(&ProbeResult::all_up()), Level::INFO);
        let page_down = ProbeResult {
            page_up: false,
            ..ProbeResult::all_up()
        };
        assert_eq!(severity(&page_down), Level::WARN);
        let server_down = ProbeResult {
            server_up: false,
            page_up: false,
            ..ProbeResult::all_up()
        };
        assert_eq!(severity(&server_down), Level::ERROR);
    }
}
