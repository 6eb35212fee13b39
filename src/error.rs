use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("failed to fetch price for {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("analysis failed for {symbol}: {reason}")]
    Analysis { symbol: String, reason: String },

    #[error("config missing: {0}")]
    ConfigMissing(String),

    #[error("invalid instrument: {0}")]
    InvalidInstrument(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    pub fn fetch(symbol: &str, reason: impl Into<String>) -> Self {
        Self::Fetch {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub fn analysis(symbol: &str, reason: impl Into<String>) -> Self {
        Self::Analysis {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
