use serde::Serialize;
use tokio::sync::broadcast;

/// Event pushed to every `/events` subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerEvent {
    pub name: String,
    pub data: String,
}

impl ServerEvent {
    pub fn new(name: &str, data: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            data: data.into(),
        }
    }

    pub fn json<T: Serialize>(name: &str, payload: &T) -> Self {
        let data = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
        Self::new(name, data)
    }

    pub fn signal(name: &str) -> Self {
        Self::new(name, "1")
    }
}

pub type EventSender = broadcast::Sender<ServerEvent>;

pub fn channel(capacity: usize) -> (EventSender, broadcast::Receiver<ServerEvent>) {
    broadcast::channel(capacity)
}
