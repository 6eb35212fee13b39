use serde::{Deserialize, Serialize};

pub const DEFAULT_COOLDOWN_PERIOD_MINUTES: f64 = 5.0;
pub const DEFAULT_MAX_ALERTS_PER_DAY: u32 = 2;

/// User-tunable notification policy, read fresh every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollConfig {
    #[serde(default = "default_cooldown")]
    pub cooldown_period_minutes: f64,
    #[serde(default = "default_max_alerts")]
    pub max_alerts_per_day: u32,
}

fn default_cooldown() -> f64 {
    DEFAULT_COOLDOWN_PERIOD_MINUTES
}

fn default_max_alerts() -> u32 {
    DEFAULT_MAX_ALERTS_PER_DAY
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            cooldown_period_minutes: DEFAULT_COOLDOWN_PERIOD_MINUTES,
            max_alerts_per_day: DEFAULT_MAX_ALERTS_PER_DAY,
        }
    }
}

impl PollConfig {
    pub fn cooldown(&self) -> chrono::Duration {
        let ms = (self.cooldown_period_minutes.max(0.0) * 60_000.0).round() as i64;
        chrono::Duration::milliseconds(ms)
    }
}
