use std::{collections::VecDeque, sync::Arc, sync::Mutex};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    events::{EventSender, ServerEvent},
    services::clock::{Clock, SystemClock},
};

pub const MAX_LOG_ENTRIES: usize = 1000;
pub const MAX_LLM_INTERACTIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    Llm,
}

impl LogLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Llm => "LLM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Default)]
struct Buffers {
    entries: VecDeque<LogEntry>,
    llm: VecDeque<LogEntry>,
}

/// User-facing activity feed. Mirrors every entry to `tracing` and to the
/// event channel; recording never fails.
pub struct ActivityLog {
    clock: Arc<dyn Clock>,
    events: Option<EventSender>,
    buffers: Mutex<Buffers>,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), None)
    }
}

impl ActivityLog {
    pub fn new(clock: Arc<dyn Clock>, events: Option<EventSender>) -> Self {
        Self {
            clock,
            events,
            buffers: Mutex::new(Buffers::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Buffers> {
        self.buffers.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn log(&self, message: impl Into<String>, level: LogLevel, details: Option<Value>) {
        let message = pretty_if_json(message.into());
        let details = details.filter(|d| d.is_object());

        match level {
            LogLevel::Error => tracing::error!(target: "activity", "{}", message),
            LogLevel::Warning => tracing::warn!(target: "activity", "{}", message),
            LogLevel::Llm => tracing::info!(target: "activity", kind = "llm", "{}", message),
            LogLevel::Info | LogLevel::Success => tracing::info!(target: "activity", "{}", message),
        }

        let entry = LogEntry {
            timestamp: self.clock.now(),
            level,
            message,
            details,
        };

        {
            let mut buf = self.lock();

            if level == LogLevel::Llm && entry.details.is_some() {
                buf.llm.push_back(entry.clone());
                if buf.llm.len() > MAX_LLM_INTERACTIONS {
                    buf.llm.pop_front();
                }
            }

            buf.entries.push_back(entry.clone());
            if buf.entries.len() > MAX_LOG_ENTRIES {
                buf.entries.pop_front();
            }
        }

        if let Some(tx) = &self.events {
            let _ = tx.send(ServerEvent::json("log", &entry));
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(message, LogLevel::Info, None);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.log(message, LogLevel::Success, None);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(message, LogLevel::Warning, None);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(message, LogLevel::Error, None);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().entries.iter().cloned().collect()
    }

    pub fn llm_interactions(&self) -> Vec<LogEntry> {
        self.lock().llm.iter().cloned().collect()
    }

    pub fn clear(&self) {
        let mut buf = self.lock();
        buf.entries.clear();
        buf.llm.clear();
    }

    pub fn format_for_download(&self) -> String {
        format_entries(&self.entries())
    }

    pub fn download_filename(&self) -> String {
        format!(
            "stock_monitor_logs_{}.txt",
            self.clock.now().with_timezone(&Local).format("%Y-%m-%d")
        )
    }
}

fn pretty_if_json(message: String) -> String {
    let trimmed = message.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return message;
    }

    serde_json::from_str::<Value>(&message)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or(message)
}

fn detail_str(details: &Value, key: &str) -> String {
    match details.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

pub fn format_entries(entries: &[LogEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            let ts = e.timestamp.with_timezone(&Local).format("%I:%M:%S %p");

            match (&e.level, &e.details) {
                (LogLevel::Llm, Some(d)) => format!(
                    "\n[{ts}] LLM Interaction for {}\nPrice: {} | Thresholds: {} - {}\n\nRequest:\n{}\n\nResponse:\n{}\n----------------------------------------",
                    detail_str(d, "symbol"),
                    detail_str(d, "currentPrice"),
                    detail_str(d, "lowerThreshold"),
                    detail_str(d, "upperThreshold"),
                    detail_str(d, "request"),
                    detail_str(d, "response"),
                ),
                _ => format!("[{ts}] {}  {}", e.level.label(), e.message),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
