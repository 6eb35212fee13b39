#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use stockwatch::{
    AppState, config,
    error::{MonitorError, Result},
    events,
    services::{
        activity_log::ActivityLog,
        analysis::{AnalysisRequest, AnalysisStrategy, RuleBasedAnalyst},
        clock::{Clock, ManualClock},
        notifier::RecordingNotifier,
        poll_cycle::Collaborators,
        price_history::PriceHistoryStore,
        price_source::PriceSource,
        storage::{MemoryStorage, Storage},
    },
};

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 14, 30, 0).unwrap()
}

/// Hands out queued prices per symbol; an empty queue is a fetch failure.
#[derive(Default)]
pub struct ScriptedPrices {
    queues: Mutex<HashMap<String, VecDeque<f64>>>,
}

impl ScriptedPrices {
    pub fn push(&self, symbol: &str, prices: &[f64]) {
        let mut q = self.queues.lock().unwrap();
        q.entry(symbol.to_string()).or_default().extend(prices.iter().copied());
    }
}

#[async_trait]
impl PriceSource for ScriptedPrices {
    async fn fetch_price(&self, symbol: &str) -> Result<f64> {
        self.queues
            .lock()
            .unwrap()
            .get_mut(symbol)
            .and_then(|q| q.pop_front())
            .ok_or_else(|| MonitorError::fetch(symbol, "no scripted price"))
    }
}

/// Counts calls; fails every call when `fail` is set.
#[derive(Default)]
pub struct CountingAnalyst {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl CountingAnalyst {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisStrategy for CountingAnalyst {
    async fn run_analysis(&self, request: &AnalysisRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MonitorError::analysis(&request.symbol, "backend unavailable"));
        }
        RuleBasedAnalyst.run_analysis(request).await
    }
}

pub struct Harness {
    pub storage: Arc<MemoryStorage>,
    pub prices: Arc<ScriptedPrices>,
    pub analyst: Arc<CountingAnalyst>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<ManualClock>,
    pub history: Arc<PriceHistoryStore>,
    pub activity: Arc<ActivityLog>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_analyst(CountingAnalyst::default())
    }

    pub fn with_analyst(analyst: CountingAnalyst) -> Self {
        let clock = Arc::new(ManualClock::new(start_time()));
        let clock_dyn: Arc<dyn Clock> = clock.clone();

        Self {
            storage: Arc::new(MemoryStorage::new()),
            prices: Arc::new(ScriptedPrices::default()),
            analyst: Arc::new(analyst),
            notifier: Arc::new(RecordingNotifier::new()),
            activity: Arc::new(ActivityLog::new(clock_dyn, None)),
            history: Arc::new(PriceHistoryStore::new()),
            clock,
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            storage: self.storage.clone(),
            prices: self.prices.clone(),
            analyst: self.analyst.clone(),
            notifier: self.notifier.clone(),
            clock: self.clock.clone(),
            history: self.history.clone(),
            activity: self.activity.clone(),
        }
    }

    pub fn app_state(&self) -> AppState {
        let (events_tx, _rx) = events::channel(64);
        AppState::new(config::Settings::default(), self.collaborators(), events_tx)
    }

    pub async fn set(&self, key: &str, value: serde_json::Value) {
        self.storage.set(key, value).await.unwrap();
    }

    pub fn activity_count(&self, needle: &str) -> usize {
        self.activity
            .entries()
            .iter()
            .filter(|e| e.message.contains(needle))
            .count()
    }
}
