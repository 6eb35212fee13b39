//! Library entrypoint for StockWatch.
//!
//! The binary only wires things together; integration tests under `tests/`
//! build the same `AppState` with in-memory collaborators.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod events;
pub mod models;

pub mod services;

pub mod controllers;
pub mod routes;

use services::{
    activity_log::ActivityLog,
    poll_cycle::{Collaborators, PollCycle},
    price_history::PriceHistoryStore,
    storage::Storage,
};

#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub storage: Arc<dyn Storage>,
    pub monitor: Arc<tokio::sync::Mutex<PollCycle>>,
    pub history: Arc<PriceHistoryStore>,
    pub activity: Arc<ActivityLog>,
    pub events_tx: events::EventSender,
}

impl AppState {
    pub fn new(settings: config::Settings, deps: Collaborators, events_tx: events::EventSender) -> Self {
        let cooldown = chrono::Duration::seconds(settings.analysis_cooldown_secs as i64);

        Self {
            storage: deps.storage.clone(),
            history: deps.history.clone(),
            activity: deps.activity.clone(),
            monitor: Arc::new(tokio::sync::Mutex::new(PollCycle::new(deps, cooldown))),
            settings,
            events_tx,
        }
    }
}
