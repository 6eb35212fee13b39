use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::json;

use crate::{
    error::{MonitorError, Result},
    models::{AlertType, MonitoredInstrument, Notification, PollConfig},
    services::{
        activity_log::{ActivityLog, LogLevel},
        alert_state::AlertStateMachine,
        analysis::{AnalysisGate, AnalysisRequest, AnalysisStrategy, GateDecision, ThresholdProximity},
        clock::Clock,
        config_service,
        instruments_service::{self, InstrumentChanges},
        notifier::Notifier,
        notification_throttle::{DenyReason, NotificationThrottle},
        price_history::PriceHistoryStore,
        price_source::PriceSource,
        storage::Storage,
    },
};

/// Everything the engine talks to but does not own.
#[derive(Clone)]
pub struct Collaborators {
    pub storage: Arc<dyn Storage>,
    pub prices: Arc<dyn PriceSource>,
    pub analyst: Arc<dyn AnalysisStrategy>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    pub history: Arc<PriceHistoryStore>,
    pub activity: Arc<ActivityLog>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub checked: usize,
    pub failures: usize,
    pub analyses: usize,
    pub notifications: usize,
    pub suppressed: usize,
}

/// One poll tick over every monitored instrument. Owns all per-symbol
/// decision state; callers serialise access (one cycle at a time).
pub struct PollCycle {
    deps: Collaborators,
    alerts: AlertStateMachine,
    throttle: NotificationThrottle,
    gate: AnalysisGate,
    idle_logged: bool,
}

impl PollCycle {
    pub fn new(deps: Collaborators, analysis_cooldown: Duration) -> Self {
        Self {
            deps,
            alerts: AlertStateMachine::new(),
            throttle: NotificationThrottle::new(),
            gate: AnalysisGate::new(analysis_cooldown),
            idle_logged: false,
        }
    }

    pub fn alerts(&self) -> &AlertStateMachine {
        &self.alerts
    }

    pub fn throttle(&self) -> &NotificationThrottle {
        &self.throttle
    }

    pub fn gate(&self) -> &AnalysisGate {
        &self.gate
    }

    /// Aborts only when the instrument list or poll config cannot be read.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let instruments = instruments_service::load_instruments(self.deps.storage.as_ref()).await?;
        let config = config_service::load_poll_config(self.deps.storage.as_ref()).await?;

        let mut report = CycleReport::default();

        if instruments.is_empty() {
            if !self.idle_logged {
                self.deps.activity.info("No stocks being monitored");
                self.idle_logged = true;
            }
            return Ok(report);
        }
        self.idle_logged = false;

        self.deps.activity.info(format!(
            "Current poll config: cooldown {} min, max {} alerts/day",
            config.cooldown_period_minutes, config.max_alerts_per_day
        ));

        for inst in &instruments {
            match self.process_instrument(inst, &config, &mut report).await {
                Ok(()) => report.checked += 1,
                Err(e @ MonitorError::Fetch { .. }) => {
                    report.failures += 1;
                    self.deps
                        .activity
                        .error(format!("Failed to fetch price for {}: {e}", inst.symbol));
                }
                Err(e) => {
                    report.failures += 1;
                    self.deps
                        .activity
                        .error(format!("Error checking stock {}: {e}", inst.symbol));
                }
            }
        }

        tracing::debug!(?report, "poll cycle finished");
        Ok(report)
    }

    async fn process_instrument(
        &mut self,
        inst: &MonitoredInstrument,
        config: &PollConfig,
        report: &mut CycleReport,
    ) -> Result<()> {
        let sym = inst.symbol.as_str();
        let (lower, upper) = (inst.lower_threshold, inst.upper_threshold);

        let price = self.deps.prices.fetch_price(sym).await?;
        let now = self.deps.clock.now();

        self.deps.history.record_price(sym, price, now);
        self.deps.activity.info(format!(
            "Checking {sym}: Price={price}, Lower={lower}, Upper={upper}"
        ));

        let p = ThresholdProximity::new(price, lower, upper);
        self.deps.activity.info(format!(
            "Price differences for {sym}: Lower={:.2}%, Upper={:.2}%",
            p.lower_pct, p.upper_pct
        ));

        match self.gate.check(sym, price, lower, upper, now) {
            GateDecision::Invoke => {
                self.analyze(inst, price, now).await;
                report.analyses += 1;
            }
            GateDecision::OutOfRange => {
                self.deps.activity.info(format!(
                    "Skipping analysis for {sym} (Price not within 5% of thresholds)"
                ));
            }
            GateDecision::Cooldown { remaining } => {
                let minutes_left = (remaining.num_milliseconds() + 59_999) / 60_000;
                self.deps.activity.info(format!(
                    "Skipping analysis for {sym} (Cooldown period: {minutes_left} minutes left)"
                ));
            }
        }

        // every observed price moves the state machine; the throttle only
        // decides whether a crossing gets surfaced
        let alert = self.alerts.evaluate(sym, price, lower, upper, now);
        let decision = self.throttle.evaluate(sym, now, config);

        let Some(kind) = alert.alert_type.filter(|_| alert.should_alert) else {
            return Ok(());
        };

        if !decision.allow {
            report.suppressed += 1;
            let why = match decision.reason {
                Some(DenyReason::CooldownActive) => "within cooldown period",
                Some(DenyReason::MaxAlertsReached) => "max alerts reached",
                None => "throttled",
            };
            self.deps.activity.info(format!(
                "Skipping notification for {sym} ({why}), {} crossing not surfaced",
                kind.as_str()
            ));
            return Ok(());
        }

        let threshold = match kind {
            AlertType::Lower => lower,
            AlertType::Upper => upper,
        };

        self.deps
            .notifier
            .emit(Notification::threshold_alert(sym, kind, price, threshold));
        self.throttle.record_sent(sym, now);
        report.notifications += 1;

        self.deps.activity.success(format!(
            "Sent {} threshold alert for {sym}",
            kind.as_str()
        ));

        Ok(())
    }

    /// The gate's cooldown is consumed by the attempt, whatever the outcome.
    async fn analyze(&mut self, inst: &MonitoredInstrument, price: f64, now: DateTime<Utc>) {
        let sym = inst.symbol.as_str();
        let request = AnalysisRequest {
            symbol: sym.to_string(),
            price,
            lower: inst.lower_threshold,
            upper: inst.upper_threshold,
            history: self.deps.history.formatted_history(sym),
        };
        let prompt = request.prompt();

        self.deps.activity.info(format!(
            "Calling analysis for {sym} (Price within 5% of threshold)"
        ));

        let result = self.deps.analyst.run_analysis(&request).await;
        self.gate.record_call(sym, now);

        match result {
            Ok(text) => {
                self.deps.activity.log(
                    "LLM Analysis",
                    LogLevel::Llm,
                    Some(json!({
                        "symbol": sym,
                        "request": prompt,
                        "response": text,
                        "currentPrice": price,
                        "lowerThreshold": inst.lower_threshold,
                        "upperThreshold": inst.upper_threshold,
                    })),
                );
                self.deps
                    .activity
                    .success(format!("Analysis for {sym}: {text}"));
            }
            Err(e) => {
                self.deps
                    .activity
                    .error(format!("Error getting analysis for {sym}: {e}"));
            }
        }
    }

    /// Applies a watch-list edit: removed symbols lose their alert state and
    /// price history, added or re-thresholded symbols start again from `Normal`.
    pub fn on_instruments_changed(&mut self, old: &[MonitoredInstrument], new: &[MonitoredInstrument]) {
        let changes = InstrumentChanges::diff(old, new);

        for sym in &changes.removed {
            self.alerts.remove(sym);
            self.deps.history.remove_symbol(sym);
            self.deps
                .activity
                .info(format!("Removed alert state and price history for {sym}"));
        }

        for sym in &changes.added {
            self.alerts.remove(sym);
        }

        for sym in &changes.edited {
            self.alerts.reset(sym);
            self.deps
                .activity
                .info(format!("Reset alert state for {sym} due to threshold update"));
        }

        if !new.is_empty() {
            self.idle_logged = false;
        }
    }

    pub fn reset_all_counters(&mut self) {
        self.throttle.reset_all_counters();
        self.deps
            .activity
            .info("Daily alert counters reset");
    }
}
