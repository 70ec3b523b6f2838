use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::probe::validate_ping_host;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonitorConfig {
    /// Scheme + host of the monitored server, e.g. "http://10.56.211.116/".
    pub base_address: String,
    /// Ports to poll, in order. Non-integer entries are rejected at parse
    /// time, before any network call.
    pub ports: Vec<u16>,
    /// Explicit page to request. When absent the page is derived from the
    /// base address (empty segment means the homepage).
    pub page: Option<String>,
    #[serde(default)]
    pub friendly_names: HashMap<u16, String>,
    #[serde(default = "default_true")]
    pub use_friendly_names: bool,
    /// Suppresses the console echo of snapshots and the startup banner.
    #[serde(default)]
    pub silent_run: bool,
    #[serde(default = "default_true")]
    pub use_alert_on_error: bool,
    #[serde(default = "default_true")]
    pub show_startup_banner: bool,
    /// Seconds to sleep between full passes over all ports.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    /// Well-known host pinged to establish local network connectivity.
    #[serde(default = "default_ping_host")]
    pub ping_host: String,
    pub webhook_url: Option<String>,
    #[serde(default = "default_alert_style")]
    pub alert_style: String,
}

fn default_true() -> bool {
    true
}

pub fn default_poll_interval() -> u64 {
    120
}

pub fn default_ping_host() -> String {
    "8.8.8.8".into()
}

fn default_alert_style() -> String {
    "error_topmost".into()
}

impl MonitorConfig {
    /// Checks the invariants serde cannot express. Called once at startup;
    /// a failure here is fatal before any probe runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_address.trim().is_empty() {
            return Err(ConfigError::EmptyAddress);
        }
        if self.ports.is_empty() {
            return Err(ConfigError::EmptyPorts);
        }
        if self.poll_interval == 0 {
            return Err(ConfigError::BadPollInterval);
        }
        validate_ping_host(&self.ping_host)?;
        Ok(())
    }
}
