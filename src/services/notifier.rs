use std::sync::Mutex;

use crate::{
    events::{EventSender, ServerEvent},
    models::Notification,
};

/// Fire-and-forget delivery of a user-facing alert.
pub trait Notifier: Send + Sync {
    fn emit(&self, notification: Notification);
}

/// Pushes notifications to `/events` subscribers.
pub struct BroadcastNotifier {
    events: EventSender,
}

impl BroadcastNotifier {
    pub fn new(events: EventSender) -> Self {
        Self { events }
    }
}

impl Notifier for BroadcastNotifier {
    fn emit(&self, notification: Notification) {
        tracing::warn!(
            symbol = %notification.symbol,
            alert = notification.alert_type.as_str(),
            "{}: {}",
            notification.title,
            notification.body
        );

        // no subscribers is fine
        let _ = self.events.send(ServerEvent::json("notification", &notification));
    }
}

/// Keeps every notification in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn emit(&self, notification: Notification) {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}
