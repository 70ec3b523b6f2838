use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::address::MonitorTarget;
use crate::config::MonitorConfig;
use crate::models::AlertStyle;
use crate::notify::{AlertDispatcher, WebhookNotifier};
use crate::probe::ReachabilityProbe;
use crate::report::StatusReporter;
use crate::state::AvailabilityState;

/// Owns the whole monitoring pipeline for one target: address resolution,
/// the reachability probe, per-port downtime state, the reporter and the
/// alert dispatcher. Strictly sequential; there is never more than one
/// check in flight.
pub struct Monitor {
    target: MonitorTarget,
    probe: ReachabilityProbe,
    states: HashMap<u16, AvailabilityState>,
    reporter: StatusReporter,
    dispatcher: AlertDispatcher,
    poll_interval: Duration,
    silent_run: bool,
    show_startup_banner: bool,
    just_started: bool,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let target = MonitorTarget::new(
            &config.base_address,
            config.ports.clone(),
            config.page.clone(),
            config.friendly_names.clone(),
        )?;
        let mut probe = ReachabilityProbe::new()?;
        probe.set_ping_host(&config.ping_host)?;
        let reporter = StatusReporter::new(
            config.use_friendly_names,
            config.use_alert_on_error,
            AlertStyle::parse_lenient(&config.alert_style),
        );
        let webhook = config
            .webhook_url
            .clone()
            .map(|url| WebhookNotifier::new(url, probe.http_client().clone()));
        let states = config
            .ports
            .iter()
            .map(|&port| (port, AvailabilityState::new()))
            .collect();

        Ok(Self {
            target,
            probe,
            states,
            reporter,
            dispatcher: AlertDispatcher::new(webhook),
            poll_interval: Duration::from_secs(config.poll_interval),
            silent_run: config.silent_run,
            show_startup_banner: config.show_startup_banner,
            just_started: true,
        })
    }

    /// Polls every configured port in order, sleeps, repeats. The shutdown
    /// signal is observed between ports and between cycles, never
    /// mid-probe, so the loop always leaves whole state behind.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        if self.show_startup_banner && !self.silent_run {
            println!("initializing server status checker...");
        }
        info!(
            "polling {} on ports {:?} every {}s (local network check via {})",
            self.target.base_address(),
            self.target.ports(),
            self.poll_interval.as_secs(),
            self.probe.ping_host()
        );

        loop {
            if self.just_started {
                self.just_started = false;
                if !self.silent_run {
                    println!("Checking for initial server availability.\n");
                }
            }

            for port in self.target.ports().to_vec() {
                if *shutdown.borrow() {
                    info!("shutdown requested, stopping poll loop");
                    return Ok(());
                }
                if let Err(e) = self.poll_port(port).await {
                    error!("unexpected error during poll cycle on port {port}: {e:#}");
                    return Err(e);
                }
            }

            tokio::select! {
                _ = shutdown.changed() => {
                    info!("shutdown requested, stopping poll loop");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// One port's full cycle: probe, observe, render, echo, log, alert.
    /// `observe` runs exactly once per invocation, so the downtime clock
    /// advances once per poll and never as a side effect of formatting.
    async fn poll_port(&mut self, port: u16) -> Result<()> {
        self.target
            .set_active_port(port)
            .with_context(|| format!("cannot activate port {port}"))?;

        let probe = self.probe.probe(&self.target).await;
        let state = self.states.entry(port).or_default();
        let observation = state.observe(&probe);
        let (snapshot, alert) = self.reporter.render(&self.target, &probe, &observation);

        if !self.silent_run {
            println!("{snapshot}");
        }
        self.reporter.log_status(&snapshot, &probe);
        if observation.is_down {
            debug!(
                "port {port} down for {}s (since {:?})",
                observation.time_down.num_seconds(),
                observation.down_since
            );
        }
        if let Some(alert) = alert {
            self.dispatcher.dispatch(&alert).await;
        }
        Ok(())
    }
}
