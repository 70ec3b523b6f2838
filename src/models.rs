use std::fmt;

use tracing::warn;

/// Display word for one layer of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Up,
    Down,
}

impl From<bool> for Status {
    fn from(up: bool) -> Self {
        if up {
            Status::Up
        } else {
            Status::Down
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Up => write!(f, "UP"),
            Status::Down => write!(f, "DOWN"),
        }
    }
}

/// Outcome of one pass of the four reachability checks against the active
/// port. Each field is computed fresh on every poll; nothing is cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeResult {
    pub local_network_up: bool,
    pub machine_up: bool,
    pub server_up: bool,
    /// Only ever true when `server_up` is true; the page check is skipped
    /// when the server check fails.
    pub page_up: bool,
    /// HTML `<title>` captured from the page body, when one was served.
    pub html_title: Option<String>,
}

impl ProbeResult {
    /// Composite down state: any layer failing means the stack is down.
    pub fn is_down(&self) -> bool {
        !self.local_network_up || !self.machine_up || !self.server_up || !self.page_up
    }

    pub fn all_up() -> Self {
        Self {
            local_network_up: true,
            machine_up: true,
            server_up: true,
            page_up: true,
            html_title: None,
        }
    }
}

/// Message-box style, keyed to the Win32 style codes the native fallback
/// understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertStyle {
    Ok,
    OkCancel,
    YesNo,
    /// Error icon, system-modal (shown above all other windows).
    #[default]
    ErrorTopmost,
}

impl AlertStyle {
    /// Win32 `MessageBoxW` style bits.
    pub fn code(self) -> u32 {
        match self {
            AlertStyle::Ok => 0x0000,
            AlertStyle::OkCancel => 0x0001,
            AlertStyle::YesNo => 0x0004,
            AlertStyle::ErrorTopmost => 0x1000 | 0x0010,
        }
    }

    /// Lenient parse for the configuration surface. An unknown name is not
    /// an error: it substitutes the default style and logs a warning.
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "ok" => AlertStyle::Ok,
            "ok_cancel" => AlertStyle::OkCancel,
            "yes_no" => AlertStyle::YesNo,
            "error_topmost" => AlertStyle::ErrorTopmost,
            other => {
                warn!("given alert style {:?} is not valid, using default", other);
                AlertStyle::default()
            }
        }
    }
}

/// One alert decision, handed to the notifier chain.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub title: String,
    pub body: String,
    pub style: AlertStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_words() {
        assert_eq!(Status::from(true).to_string(), "UP");
        assert_eq!(Status::from(false).to_string(), "DOWN");
    }

    #[test]
    fn all_up_is_not_down() {
        assert!(!ProbeResult::all_up().is_down());
    }

    #[test]
    fn any_single_failure_is_down() {
        for layer in 0..4 {
            let mut probe = ProbeResult::all_up();
            match layer {
                0 => probe.local_network_up = false,
                1 => probe.machine_up = false,
                2 => probe.server_up = false,
                _ => probe.page_up = false,
            }
            assert!(probe.is_down(), "layer {layer} down must flag the stack down");
        }
    }

    #[test]
    fn alert_style_codes_match_native_values() {
        assert_eq!(AlertStyle::Ok.code(), 0);
        assert_eq!(AlertStyle::OkCancel.code(), 1);
        assert_eq!(AlertStyle::YesNo.code(), 4);
        assert_eq!(AlertStyle::ErrorTopmost.code(), 0x1010);
    }

    #[test]
    fn alert_style_parses_known_names() {
        assert_eq!(AlertStyle::parse_lenient("ok"), AlertStyle::Ok);
        assert_eq!(AlertStyle::parse_lenient("Yes_No"), AlertStyle::YesNo);
        assert_eq!(AlertStyle::parse_lenient("error_topmost"), AlertStyle::ErrorTopmost);
    }

    #[test]
    fn unknown_alert_style_substitutes_default() {
        assert_eq!(AlertStyle::parse_lenient("abort_retry"), AlertStyle::ErrorTopmost);
        assert_eq!(AlertStyle::parse_lenient(""), AlertStyle::ErrorTopmost);
    }
}
