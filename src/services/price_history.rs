use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use chrono::{DateTime, Local, Utc};

use crate::models::PriceHistoryEntry;

pub const HISTORY_LIMIT: usize = 100;

/// Per-symbol bounded price log, oldest evicted first.
#[derive(Debug)]
pub struct PriceHistoryStore {
    limit: usize,
    entries: Mutex<HashMap<String, VecDeque<PriceHistoryEntry>>>,
}

impl Default for PriceHistoryStore {
    fn default() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }
}

impl PriceHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, VecDeque<PriceHistoryEntry>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record_price(&self, symbol: &str, price: f64, timestamp: DateTime<Utc>) {
        let mut map = self.lock();
        let entries = map.entry(symbol.to_string()).or_default();

        entries.push_back(PriceHistoryEntry {
            timestamp,
            symbol: symbol.to_string(),
            price,
        });

        while entries.len() > self.limit {
            entries.pop_front();
        }
    }

    /// Oldest first, most recent last.
    pub fn recent_history(&self, symbol: &str) -> Vec<PriceHistoryEntry> {
        self.lock()
            .get(symbol)
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every symbol merged, newest first.
    pub fn all_history(&self) -> Vec<PriceHistoryEntry> {
        let mut all: Vec<PriceHistoryEntry> = self
            .lock()
            .values()
            .flat_map(|e| e.iter().cloned())
            .collect();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        all
    }

    pub fn remove_symbol(&self, symbol: &str) {
        self.lock().remove(symbol);
    }

    pub fn formatted_history(&self, symbol: &str) -> String {
        format_history(&self.recent_history(symbol))
    }
}

pub fn format_history(entries: &[PriceHistoryEntry]) -> String {
    if entries.is_empty() {
        return "No price history available".to_string();
    }

    entries
        .iter()
        .map(|e| {
            let when = e.timestamp.with_timezone(&Local).format("%b %-d, %I:%M %p");
            format!("{when} | {}: {}", e.symbol, e.price)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
