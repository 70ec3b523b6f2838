use std::collections::HashMap;

use tracing::warn;

use crate::error::ConfigError;

/// Identity of the watched server: normalized base address, port list and
/// the port currently being polled. Built once at startup; only the active
/// port mutates afterwards, as the poll loop walks the list.
#[derive(Debug, Clone)]
pub struct MonitorTarget {
    base_address: String,
    ports: Vec<u16>,
    active_port: u16,
    page: Option<String>,
    friendly_names: HashMap<u16, String>,
}

impl MonitorTarget {
    pub fn new(
        base_address: &str,
        ports: Vec<u16>,
        page: Option<String>,
        friendly_names: HashMap<u16, String>,
    ) -> Result<Self, ConfigError> {
        if ports.is_empty() {
            return Err(ConfigError::EmptyPorts);
        }
        let base_address = normalize_address(base_address)?;
        let active_port = ports[0];
        Ok(Self {
            base_address,
            ports,
            active_port,
            page,
            friendly_names,
        })
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn active_port(&self) -> u16 {
        self.active_port
    }

    /// Switches the polled port. Only ports from the configured list are
    /// valid; anything else is a configuration error, not a runtime fault.
    pub fn set_active_port(&mut self, port: u16) -> Result<(), ConfigError> {
        if self.ports.contains(&port) {
            self.active_port = port;
            Ok(())
        } else {
            Err(ConfigError::PortNotConfigured { port })
        }
    }

    /// The page segment of the request target: the explicit page when one
    /// was configured, otherwise the final path segment of the normalized
    /// base address. The normalized address ends with a slash, so the
    /// derived segment is empty, meaning the homepage.
    pub fn page_path(&self) -> &str {
        match &self.page {
            Some(page) => page,
            None => self.base_address.rsplit('/').next().unwrap_or(""),
        }
    }

    /// Fully-qualified request target for the active port, always ending
    /// with a slash: `{scheme}://{host}:{port}/{page}/`.
    pub fn full_address(&self) -> String {
        let base = self.base_address.trim_end_matches('/');
        let mut full = format!("{}:{}/{}", base, self.active_port, self.page_path());
        if !full.ends_with('/') {
            full.push('/');
        }
        full
    }

    /// Host portion of the base address, for the machine-level ping.
    pub fn host(&self) -> &str {
        let after_scheme = match self.base_address.find("://") {
            Some(idx) => &self.base_address[idx + 3..],
            None => &self.base_address,
        };
        after_scheme.split('/').next().unwrap_or(after_scheme)
    }

    /// Display label for the active port: its friendly name when enabled
    /// and configured, otherwise the base address.
    pub fn server_label(&self, use_friendly_names: bool) -> &str {
        if use_friendly_names {
            if let Some(name) = self.friendly_names.get(&self.active_port) {
                return name;
            }
        }
        &self.base_address
    }
}

/// Normalizes the configured address: requires a non-empty string, defaults
/// a missing scheme to http with a warning, converts a trailing backslash
/// and guarantees a trailing slash.
fn normalize_address(address: &str) -> Result<String, ConfigError> {
    if address.trim().is_empty() {
        return Err(ConfigError::EmptyAddress);
    }
    let mut address = address.to_string();
    if !address.starts_with("http://") && !address.starts_with("https://") {
        if address.contains("://") {
            warn!("non-http or https requests may not work");
        } else {
            warn!("no url scheme detected, defaulting to http");
            address = format!("http://{address}");
        }
    }
    if address.ends_with('\\') {
        address.pop();
        address.push('/');
    } else if !address.ends_with('/') {
        address.push('/');
    }
    Ok(address)
}
