use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{AlertDecision, AlertState, AlertType, AlertZone};

/// Per-symbol threshold crossing tracker.
///
/// A crossing alerts once; the symbol has to come back strictly inside the
/// band (re-arm) before the same threshold can alert again. A jump straight
/// from one side to the other counts as a new crossing.
#[derive(Debug, Default)]
pub struct AlertStateMachine {
    states: HashMap<String, AlertState>,
}

impl AlertStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, symbol: &str) -> Option<&AlertState> {
        self.states.get(symbol)
    }

    pub fn evaluate(
        &mut self,
        symbol: &str,
        price: f64,
        lower: f64,
        upper: f64,
        now: DateTime<Utc>,
    ) -> AlertDecision {
        let state = self.states.entry(symbol.to_string()).or_default();

        // lower is checked first so an inverted band resolves to a lower alert
        if price <= lower && !state.below_lower() {
            state.zone = AlertZone::BelowLower;
            state.last_alert_price = Some(price);
            state.last_alert_time = Some(now);
            return AlertDecision::fire(AlertType::Lower);
        }

        if price >= upper && !state.above_upper() {
            state.zone = AlertZone::AboveUpper;
            state.last_alert_price = Some(price);
            state.last_alert_time = Some(now);
            return AlertDecision::fire(AlertType::Upper);
        }

        if price > lower && price < upper && !state.in_normal_range() {
            state.zone = AlertZone::Normal;
            state.last_alert_price = None;
            state.last_alert_time = None;
        }

        AlertDecision::none()
    }

    /// Back to the `Normal` default, e.g. after the thresholds were edited.
    pub fn reset(&mut self, symbol: &str) {
        self.states.insert(symbol.to_string(), AlertState::default());
    }

    pub fn remove(&mut self, symbol: &str) -> bool {
        self.states.remove(symbol).is_some()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.states.contains_key(symbol)
    }
}
