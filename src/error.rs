use thiserror::Error;

/// Construction- and assignment-time failures. These are raised before any
/// network call is attempted and are fatal to the operation that produced
/// them; ordinary unreachability is never an error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("server address must not be empty")]
    EmptyAddress,

    #[error("ports must be a non-empty list")]
    EmptyPorts,

    #[error("port {port} is not in the configured port list")]
    PortNotConfigured { port: u16 },

    #[error("ping host {given:?} must be a plain dotted-quad address")]
    InvalidPingHost { given: String },

    #[error("poll interval must be a positive number of seconds")]
    BadPollInterval,
}

/// Alert delivery failures. Recovered locally by the dispatcher (logged,
/// fallback attempted); never escalated past the reporter.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("desktop notification failed: {0}")]
    Desktop(String),

    #[error("message box unavailable: {0}")]
    MessageBox(String),
}
