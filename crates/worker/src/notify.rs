//! Push notifications and notification-click handling.
//!
//! Independent of the router; shares only the configuration. Absent or
//! malformed push payloads are a no-op, never an error surfaced to the
//! user.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::capabilities::{NotificationDisplay, WindowClients};
use netfirst_core::{AppConfig, Error};

/// Structured push payload. Every field is optional and falls back to the
/// configured defaults; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
}

/// Opaque data carried on a displayed notification, handed back on click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    /// Target URL to focus or open when the notification is clicked.
    pub url: String,
}

/// Display record handed to the host's notification capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibration: Vec<u32>,
    pub data: NotificationData,
}

/// A notification the user clicked, as reported by the host.
#[derive(Debug, Clone)]
pub struct ClickedNotification {
    pub tag: String,
    pub data: NotificationData,
}

/// Outcome of a notification click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An already-open window matched the target URL and was focused.
    Focused { client: String },
    /// A new window was opened at the target URL.
    Opened { url: String },
    /// Nothing matched and the host cannot open windows.
    NoCapability,
}

/// Turns push events into displayed notifications and click events into
/// window focus/open actions.
pub struct NotificationBridge<D, W> {
    config: Arc<AppConfig>,
    display: Arc<D>,
    clients: Arc<W>,
}

impl<D: NotificationDisplay, W: WindowClients> NotificationBridge<D, W> {
    pub fn new(config: Arc<AppConfig>, display: Arc<D>, clients: Arc<W>) -> Self {
        Self { config, display, clients }
    }

    /// Handle a push event.
    ///
    /// Returns the title and record that were displayed, or `None` when the
    /// payload was absent or unparseable. A display failure propagates; it
    /// is not separately recovered.
    pub async fn on_push(&self, payload: Option<&[u8]>) -> Result<Option<(String, NotificationRecord)>, Error> {
        let Some(bytes) = payload else {
            return Ok(None);
        };

        let payload: PushPayload = match serde_json::from_slice(bytes) {
            Ok(p) => p,
            Err(e) => {
                let err = Error::MalformedPayload(e.to_string());
                tracing::debug!(error = %err, "ignoring unparseable push payload");
                return Ok(None);
            }
        };

        let defaults = &self.config.notifications;
        let title = payload.title.unwrap_or_else(|| defaults.title.clone());
        let record = NotificationRecord {
            body: payload.body.unwrap_or_else(|| defaults.fallback_body.clone()),
            icon: defaults.icon.clone(),
            badge: defaults.badge.clone(),
            vibration: defaults.vibration.clone(),
            data: NotificationData { url: payload.url.unwrap_or_else(|| defaults.default_target.clone()) },
        };

        self.display.show(&title, &record).await?;

        Ok(Some((title, record)))
    }

    /// Handle a click: dismiss the notification, then focus the first open
    /// window whose URL contains the target, or open a new window at the
    /// target if none matches.
    pub async fn on_click(&self, notification: &ClickedNotification) -> Result<ClickOutcome, Error> {
        self.display.dismiss(&notification.tag).await?;

        let target = notification.data.url.as_str();
        for client in self.clients.enumerate(true).await? {
            if client.url.contains(target) {
                self.clients.focus(&client.id).await?;
                return Ok(ClickOutcome::Focused { client: client.id });
            }
        }

        if self.clients.supports_open_window() {
            self.clients.open_window(target).await?;
            return Ok(ClickOutcome::Opened { url: target.to_string() });
        }

        Ok(ClickOutcome::NoCapability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::WindowClient;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDisplay {
        shown: Mutex<Vec<(String, NotificationRecord)>>,
        dismissed: Mutex<Vec<String>>,
        fail_show: bool,
    }

    #[async_trait]
    impl NotificationDisplay for RecordingDisplay {
        async fn show(&self, title: &str, record: &NotificationRecord) -> Result<(), Error> {
            if self.fail_show {
                return Err(Error::DisplayFailed("denied by user".to_string()));
            }
            self.shown.lock().unwrap().push((title.to_string(), record.clone()));
            Ok(())
        }

        async fn dismiss(&self, tag: &str) -> Result<(), Error> {
            self.dismissed.lock().unwrap().push(tag.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeClients {
        windows: Vec<WindowClient>,
        can_open: bool,
        focused: Mutex<Vec<String>>,
        opened: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl WindowClients for FakeClients {
        async fn enumerate(&self, _include_uncontrolled: bool) -> Result<Vec<WindowClient>, Error> {
            Ok(self.windows.clone())
        }

        async fn focus(&self, id: &str) -> Result<(), Error> {
            self.focused.lock().unwrap().push(id.to_string());
            Ok(())
        }

        async fn open_window(&self, url: &str) -> Result<(), Error> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }

        fn supports_open_window(&self) -> bool {
            self.can_open
        }
    }

    fn bridge(
        display: RecordingDisplay,
        clients: FakeClients,
    ) -> (NotificationBridge<RecordingDisplay, FakeClients>, Arc<RecordingDisplay>, Arc<FakeClients>) {
        let display = Arc::new(display);
        let clients = Arc::new(clients);
        let bridge =
            NotificationBridge::new(Arc::new(AppConfig::default()), Arc::clone(&display), Arc::clone(&clients));
        (bridge, display, clients)
    }

    #[tokio::test]
    async fn test_push_uses_payload_fields() {
        let (bridge, display, _) = bridge(RecordingDisplay::default(), FakeClients::default());

        let shown = bridge
            .on_push(Some(br#"{"title":"A","body":"B"}"#))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(shown.0, "A");
        assert_eq!(shown.1.body, "B");
        assert_eq!(shown.1.data.url, "./");
        assert_eq!(display.shown.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_push_fills_defaults() {
        let (bridge, _, _) = bridge(RecordingDisplay::default(), FakeClients::default());

        let shown = bridge.on_push(Some(b"{}")).await.unwrap().unwrap();

        assert_eq!(shown.0, "YIU Attendance");
        assert_eq!(shown.1.body, "You have a new notification.");
        assert_eq!(shown.1.icon, "./icons/icon-192.png");
        assert_eq!(shown.1.badge, "./icons/icon-72.png");
        assert_eq!(shown.1.vibration, vec![100, 50, 100]);
        assert_eq!(shown.1.data.url, "./");
    }

    #[tokio::test]
    async fn test_push_carries_target_url() {
        let (bridge, _, _) = bridge(RecordingDisplay::default(), FakeClients::default());

        let shown = bridge
            .on_push(Some(br#"{"url":"./attendance"}"#))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(shown.1.data.url, "./attendance");
    }

    #[tokio::test]
    async fn test_push_absent_payload_is_noop() {
        let (bridge, display, _) = bridge(RecordingDisplay::default(), FakeClients::default());

        assert!(bridge.on_push(None).await.unwrap().is_none());
        assert!(display.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_push_malformed_payload_is_noop() {
        let (bridge, display, _) = bridge(RecordingDisplay::default(), FakeClients::default());

        assert!(bridge.on_push(Some(b"not json")).await.unwrap().is_none());
        assert!(display.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_push_display_failure_propagates() {
        let (bridge, _, _) = bridge(RecordingDisplay { fail_show: true, ..Default::default() }, FakeClients::default());

        let result = bridge.on_push(Some(b"{}")).await;
        assert!(matches!(result, Err(Error::DisplayFailed(_))));
    }

    fn clicked(url: &str) -> ClickedNotification {
        ClickedNotification { tag: "note-1".to_string(), data: NotificationData { url: url.to_string() } }
    }

    #[tokio::test]
    async fn test_click_focuses_first_matching_window() {
        let clients = FakeClients {
            windows: vec![
                WindowClient { id: "w1".to_string(), url: "https://other.example/".to_string() },
                WindowClient { id: "w2".to_string(), url: "https://app.example/attendance".to_string() },
                WindowClient { id: "w3".to_string(), url: "https://app.example/attendance/today".to_string() },
            ],
            can_open: true,
            ..Default::default()
        };
        let (bridge, display, clients) = bridge(RecordingDisplay::default(), clients);

        let outcome = bridge.on_click(&clicked("/attendance")).await.unwrap();

        assert_eq!(outcome, ClickOutcome::Focused { client: "w2".to_string() });
        assert_eq!(display.dismissed.lock().unwrap().as_slice(), ["note-1".to_string()]);
        assert_eq!(clients.focused.lock().unwrap().as_slice(), ["w2".to_string()]);
        assert!(clients.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_click_opens_window_when_nothing_matches() {
        let clients = FakeClients {
            windows: vec![WindowClient { id: "w1".to_string(), url: "https://other.example/".to_string() }],
            can_open: true,
            ..Default::default()
        };
        let (bridge, _, clients) = bridge(RecordingDisplay::default(), clients);

        let outcome = bridge.on_click(&clicked("./attendance")).await.unwrap();

        assert_eq!(outcome, ClickOutcome::Opened { url: "./attendance".to_string() });
        assert_eq!(clients.opened.lock().unwrap().as_slice(), ["./attendance".to_string()]);
        assert!(clients.focused.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_click_without_open_capability() {
        let (bridge, display, clients) = bridge(RecordingDisplay::default(), FakeClients::default());

        let outcome = bridge.on_click(&clicked("./")).await.unwrap();

        assert_eq!(outcome, ClickOutcome::NoCapability);
        assert_eq!(display.dismissed.lock().unwrap().len(), 1);
        assert!(clients.opened.lock().unwrap().is_empty());
    }
}
