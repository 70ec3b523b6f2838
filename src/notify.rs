use chrono::Utc;
use tracing::warn;

use crate::error::NotifyError;
use crate::models::AlertEvent;

/// Alert delivery surface. Implementations must not panic on bad input;
/// failure is reported through the result and handled by the dispatcher.
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;
    fn notify(&self, event: &AlertEvent) -> Result<(), NotifyError>;
}

/// Primary channel: a cross-platform desktop notification.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn name(&self) -> &'static str {
        "desktop notification"
    }

    fn notify(&self, event: &AlertEvent) -> Result<(), NotifyError> {
        notify_rust::Notification::new()
            .appname("sitewatch")
            .summary(&event.title)
            .body(&event.body)
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Desktop(e.to_string()))
    }
}

/// Fallback channel: the native message box on Windows, an audible console
/// banner elsewhere, so a failed primary never silences the alert.
pub struct MessageBoxNotifier;

impl Notifier for MessageBoxNotifier {
    fn name(&self) -> &'static str {
        "native message box"
    }

    #[cfg(windows)]
    fn notify(&self, event: &AlertEvent) -> Result<(), NotifyError> {
        use windows_sys::Win32::UI::WindowsAndMessaging::{MessageBeep, MessageBoxW, MB_ICONHAND};

        fn wide(text: &str) -> Vec<u16> {
            text.encode_utf16().chain(std::iter::once(0)).collect()
        }

        let title = wide(&event.title);
        let body = wide(&event.body);
        unsafe {
            MessageBeep(MB_ICONHAND);
            // null parent window; style bits follow the event's alert style
            let result =
                MessageBoxW(std::ptr::null_mut(), body.as_ptr(), title.as_ptr(), event.style.code());
            if result == 0 {
                return Err(NotifyError::MessageBox("MessageBoxW returned 0".into()));
            }
        }
        Ok(())
    }

    #[cfg(not(windows))]
    fn notify(&self, event: &AlertEvent) -> Result<(), NotifyError> {
        eprintln!("\x07==== {} ====\n{}", event.title, event.body);
        Ok(())
    }
}

/// Optional JSON webhook channel, fired best-effort alongside the dialog
/// path when a webhook URL is configured.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String, client: reqwest::Client) -> Self {
        Self { url, client }
    }

    pub async fn send(&self, event: &AlertEvent) {
        let payload = serde_json::json!({
            "username": "sitewatch",
            "embeds": [{
                "title": event.title,
                "description": event.body,
                "color": 0xE74C3C,
                "timestamp": Utc::now().to_rfc3339(),
                "footer": { "text": "sitewatch availability monitor" }
            }]
        });
        if let Err(e) = self.client.post(&self.url).json(&payload).send().await {
            warn!("webhook delivery failed: {e}");
        }
    }
}

/// Runs the notifier chain for one alert: primary first, fallback when the
/// primary fails, webhook alongside. Delivery failures are logged and
/// recovered here; they never abort status reporting.
pub struct AlertDispatcher {
    primary: Box<dyn Notifier>,
    fallback: Box<dyn Notifier>,
    webhook: Option<WebhookNotifier>,
}

impl AlertDispatcher {
    pub fn new(webhook: Option<WebhookNotifier>) -> Self {
        Self::with_notifiers(Box::new(DesktopNotifier), Box::new(MessageBoxNotifier), webhook)
    }

    pub fn with_notifiers(
        primary: Box<dyn Notifier>,
        fallback: Box<dyn Notifier>,
        webhook: Option<WebhookNotifier>,
    ) -> Self {
        Self {
            primary,
            fallback,
            webhook,
        }
    }

    pub async fn dispatch(&self, event: &AlertEvent) {
        if let Err(primary_err) = self.primary.notify(event) {
            warn!(
                "{} failed ({primary_err}), falling back to {}",
                self.primary.name(),
                self.fallback.name()
            );
            if let Err(fallback_err) = self.fallback.notify(event) {
                warn!("{} also failed: {fallback_err}", self.fallback.name());
            }
        }
        if let Some(webhook) = &self.webhook {
            webhook.send(event).await;
        }
    }
}
