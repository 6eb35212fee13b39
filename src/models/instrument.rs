use serde::{Deserialize, Serialize};

/// A stock symbol being watched, with the price band it should stay inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredInstrument {
    pub symbol: String,
    pub lower_threshold: f64,
    pub upper_threshold: f64,
}

impl MonitoredInstrument {
    pub fn new(symbol: impl Into<String>, lower_threshold: f64, upper_threshold: f64) -> Self {
        Self {
            symbol: symbol.into(),
            lower_threshold,
            upper_threshold,
        }
    }

    pub fn same_thresholds(&self, other: &MonitoredInstrument) -> bool {
        self.lower_threshold == other.lower_threshold
            && self.upper_threshold == other.upper_threshold
    }
}
