use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Lower,
    Upper,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Lower => "lower",
            AlertType::Upper => "upper",
        }
    }
}

/// Where the last observed price sat relative to the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlertZone {
    #[default]
    Normal,
    BelowLower,
    AboveUpper,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertState {
    pub zone: AlertZone,
    pub last_alert_price: Option<f64>,
    pub last_alert_time: Option<DateTime<Utc>>,
}

impl AlertState {
    pub fn below_lower(&self) -> bool {
        self.zone == AlertZone::BelowLower
    }

    pub fn above_upper(&self) -> bool {
        self.zone == AlertZone::AboveUpper
    }

    pub fn in_normal_range(&self) -> bool {
        self.zone == AlertZone::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertDecision {
    pub should_alert: bool,
    pub alert_type: Option<AlertType>,
}

impl AlertDecision {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn fire(alert_type: AlertType) -> Self {
        Self {
            should_alert: true,
            alert_type: Some(alert_type),
        }
    }
}
