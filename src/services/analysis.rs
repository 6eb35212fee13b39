use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::Result;

pub const PROXIMITY_PERCENT: f64 = 5.0;
pub const DEFAULT_ANALYSIS_COOLDOWN_SECS: i64 = 15 * 60;

/// Signed percent distance from the price to each threshold; positive while
/// the price is inside the band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdProximity {
    pub lower_pct: f64,
    pub upper_pct: f64,
}

impl ThresholdProximity {
    pub fn new(price: f64, lower: f64, upper: f64) -> Self {
        Self {
            lower_pct: (price - lower) / lower * 100.0,
            upper_pct: (upper - price) / upper * 100.0,
        }
    }

    pub fn nearest_pct(&self) -> f64 {
        self.lower_pct.abs().min(self.upper_pct.abs())
    }

    pub fn is_near(&self) -> bool {
        self.nearest_pct() <= PROXIMITY_PERCENT
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    Invoke,
    OutOfRange,
    Cooldown { remaining: Duration },
}

/// Decides whether a model call is worth making this tick. Has its own
/// cooldown, separate from the notification throttle.
#[derive(Debug)]
pub struct AnalysisGate {
    cooldown: Duration,
    last_call: HashMap<String, DateTime<Utc>>,
}

impl Default for AnalysisGate {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_ANALYSIS_COOLDOWN_SECS))
    }
}

impl AnalysisGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_call: HashMap::new(),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_call_time(&self, symbol: &str) -> Option<DateTime<Utc>> {
        self.last_call.get(symbol).copied()
    }

    pub fn check(
        &self,
        symbol: &str,
        price: f64,
        lower: f64,
        upper: f64,
        now: DateTime<Utc>,
    ) -> GateDecision {
        if !ThresholdProximity::new(price, lower, upper).is_near() {
            return GateDecision::OutOfRange;
        }

        match self.last_call.get(symbol) {
            Some(&last) => {
                let elapsed = now.signed_duration_since(last);
                if elapsed >= self.cooldown {
                    GateDecision::Invoke
                } else {
                    GateDecision::Cooldown {
                        remaining: self.cooldown - elapsed,
                    }
                }
            }
            None => GateDecision::Invoke,
        }
    }

    pub fn should_invoke(
        &self,
        symbol: &str,
        price: f64,
        lower: f64,
        upper: f64,
        now: DateTime<Utc>,
    ) -> bool {
        self.check(symbol, price, lower, upper, now) == GateDecision::Invoke
    }

    /// Consumes the cooldown; called for every attempt, whether it succeeded or not.
    pub fn record_call(&mut self, symbol: &str, now: DateTime<Utc>) {
        self.last_call.insert(symbol.to_string(), now);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub price: f64,
    pub lower: f64,
    pub upper: f64,
    pub history: String,
}

impl AnalysisRequest {
    pub fn prompt(&self) -> String {
        format!(
            "You are a stock monitoring agent. Your task is to monitor {symbol} stock price.
Current price: {price}
Lower threshold: {lower}
Upper threshold: {upper}
Previous price movements:
{history}

Analyze the current situation and provide a brief recommendation. Consider:
1. How far is the price from thresholds?
2. Recent price movement pattern
3. Suggested action for the investor

Respond in a concise format.",
            symbol = self.symbol,
            price = self.price,
            lower = self.lower,
            upper = self.upper,
            history = self.history,
        )
    }
}

/// Turns a price snapshot into a free-text recommendation.
#[async_trait]
pub trait AnalysisStrategy: Send + Sync {
    async fn run_analysis(&self, request: &AnalysisRequest) -> Result<String>;
}

/// Fixed rules standing in for a model backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedAnalyst;

impl RuleBasedAnalyst {
    pub fn recommend(price: f64, lower: f64, upper: f64) -> String {
        let p = ThresholdProximity::new(price, lower, upper);

        if price <= lower {
            format!(
                "Price has dropped below lower threshold. Currently {:.2}% below target. Consider buying if fundamentals remain strong.",
                p.lower_pct.abs()
            )
        } else if price >= upper {
            format!(
                "Price has exceeded upper threshold. Currently {:.2}% above target. Consider booking profits.",
                p.upper_pct.abs()
            )
        } else if price - lower < upper - price {
            format!(
                "Price is closer to lower threshold ({:.2}% away). Monitor for potential support levels.",
                p.lower_pct
            )
        } else {
            format!(
                "Price is closer to upper threshold ({:.2}% away). Watch for resistance levels.",
                p.upper_pct
            )
        }
    }
}

#[async_trait]
impl AnalysisStrategy for RuleBasedAnalyst {
    async fn run_analysis(&self, request: &AnalysisRequest) -> Result<String> {
        Ok(Self::recommend(request.price, request.lower, request.upper))
    }
}
