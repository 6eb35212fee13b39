use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::PollConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    CooldownActive,
    MaxAlertsReached,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::CooldownActive => "cooldown_active",
            DenyReason::MaxAlertsReached => "max_alerts_reached",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleDecision {
    pub allow: bool,
    pub reason: Option<DenyReason>,
}

impl ThrottleDecision {
    fn allow() -> Self {
        Self {
            allow: true,
            reason: None,
        }
    }

    fn deny(reason: DenyReason) -> Self {
        Self {
            allow: false,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub last_notification_time: Option<DateTime<Utc>>,
    pub alert_count_today: u32,
}

/// Cooldown and daily cap on user notifications, per symbol.
#[derive(Debug, Default)]
pub struct NotificationThrottle {
    states: HashMap<String, NotificationState>,
}

impl NotificationThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, symbol: &str) -> Option<&NotificationState> {
        self.states.get(symbol)
    }

    pub fn evaluate(
        &mut self,
        symbol: &str,
        now: DateTime<Utc>,
        config: &PollConfig,
    ) -> ThrottleDecision {
        let state = self.states.entry(symbol.to_string()).or_default();

        if let Some(last) = state.last_notification_time {
            if now.signed_duration_since(last) < config.cooldown() {
                return ThrottleDecision::deny(DenyReason::CooldownActive);
            }
        }

        if state.alert_count_today >= config.max_alerts_per_day {
            return ThrottleDecision::deny(DenyReason::MaxAlertsReached);
        }

        ThrottleDecision::allow()
    }

    pub fn record_sent(&mut self, symbol: &str, now: DateTime<Utc>) {
        let state = self.states.entry(symbol.to_string()).or_default();
        state.last_notification_time = Some(now);
        state.alert_count_today += 1;
    }

    /// Zero every daily counter. Cooldown timestamps are left alone.
    pub fn reset_all_counters(&mut self) {
        for state in self.states.values_mut() {
            state.alert_count_today = 0;
        }
    }
}
