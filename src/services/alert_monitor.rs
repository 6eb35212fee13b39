use std::time::Duration;

use chrono::Local;
use tokio::time::{self, MissedTickBehavior};

use crate::{
    AppState,
    error::Result,
    services::{clock, poll_cycle::CycleReport},
};

pub fn spawn_price_alert_monitor(state: AppState) {
    let period = Duration::from_secs(state.settings.poll_interval_secs);

    tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // the first tick is immediate; startup already ran a cycle
        interval.tick().await;

        loop {
            interval.tick().await;

            match run_now(&state).await {
                Some(Ok(report)) => tracing::debug!(?report, "[alert-monitor] tick done"),
                Some(Err(e)) => tracing::error!("[alert-monitor] tick error: {}", e),
                None => tracing::warn!("[alert-monitor] previous cycle still running, tick skipped"),
            }
        }
    });
}

/// Runs one cycle unless another is already in flight (`None`).
pub async fn run_now(state: &AppState) -> Option<Result<CycleReport>> {
    let mut monitor = state.monitor.try_lock().ok()?;
    Some(monitor.run_cycle().await)
}

/// Zeroes the daily alert counters once per local calendar day.
pub fn spawn_daily_reset(state: AppState) {
    tokio::spawn(async move {
        loop {
            let Some(target) = Local::now().date_naive().succ_opt() else {
                tracing::error!("[daily-reset] no next calendar day, stopping");
                return;
            };

            // sleep is monotonic and can wake early or late against wall time
            loop {
                let wait = clock::until_next_local_midnight()
                    .to_std()
                    .unwrap_or(Duration::from_secs(60));
                tracing::info!("[daily-reset] next counter reset in {}s", wait.as_secs());

                time::sleep(wait).await;

                if clock::reset_due(target, Local::now().date_naive()) {
                    break;
                }
            }

            reset_daily_counters(&state).await;
        }
    });
}

/// Waits out any running cycle or instrument edit, so no increment is lost.
pub async fn reset_daily_counters(state: &AppState) {
    state.monitor.lock().await.reset_all_counters();
}
