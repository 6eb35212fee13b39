use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub price: f64,
}
