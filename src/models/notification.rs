use serde::Serialize;

use super::AlertType;

pub const ALERT_PRIORITY: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub symbol: String,
    pub alert_type: AlertType,
    pub title: String,
    pub body: String,
    pub priority: u8,
}

impl Notification {
    pub fn threshold_alert(symbol: &str, alert_type: AlertType, price: f64, threshold: f64) -> Self {
        let body = match alert_type {
            AlertType::Lower => {
                format!("Price dropped to {price:.2} (below threshold of {threshold:.2})")
            }
            AlertType::Upper => {
                format!("Price rose to {price:.2} (above threshold of {threshold:.2})")
            }
        };

        Self {
            symbol: symbol.to_string(),
            alert_type,
            title: format!("Price Alert: {symbol}"),
            body,
            priority: ALERT_PRIORITY,
        }
    }
}
