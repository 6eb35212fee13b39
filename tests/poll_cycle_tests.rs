mod common;

use chrono::Duration;
use serde_json::json;
use stockwatch::{
    models::{AlertType, MonitoredInstrument},
    services::{
        alert_monitor,
        poll_cycle::PollCycle,
        storage::{POLL_CONFIG_KEY, STOCKS_KEY},
    },
};

use common::{CountingAnalyst, Harness};

fn engine(h: &Harness) -> PollCycle {
    PollCycle::new(h.collaborators(), Duration::minutes(15))
}

fn stocks(list: &[(&str, f64, f64)]) -> serde_json::Value {
    let v: Vec<MonitoredInstrument> = list
        .iter()
        .map(|(s, l, u)| MonitoredInstrument::new(*s, *l, *u))
        .collect();
    serde_json::to_value(v).unwrap()
}

async fn no_throttle(h: &Harness) {
    h.set(POLL_CONFIG_KEY, json!({ "cooldownPeriodMinutes": 0, "maxAlertsPerDay": 100 }))
        .await;
}

#[tokio::test]
async fn crossing_rearm_crossing_notifies_twice() {
    let h = Harness::new();
    h.set(STOCKS_KEY, stocks(&[("X", 100.0, 120.0)])).await;
    no_throttle(&h).await;
    h.prices.push("X", &[130.0, 130.0, 115.0, 95.0, 95.0, 110.0]);

    let mut cycle = engine(&h);
    for _ in 0..6 {
        cycle.run_cycle().await.unwrap();
        h.clock.advance(Duration::minutes(1));
    }

    let kinds: Vec<AlertType> = h.notifier.sent().iter().map(|n| n.alert_type).collect();
    assert_eq!(kinds, vec![AlertType::Upper, AlertType::Lower]);

    let first = &h.notifier.sent()[0];
    assert_eq!(first.title, "Price Alert: X");
    assert_eq!(first.body, "Price rose to 130.00 (above threshold of 120.00)");
    assert_eq!(first.priority, 2);
}

#[tokio::test]
async fn daily_cap_allows_two_then_denies() {
    let h = Harness::new();
    h.set(STOCKS_KEY, stocks(&[("X", 100.0, 120.0)])).await;
    h.set(POLL_CONFIG_KEY, json!({ "cooldownPeriodMinutes": 0, "maxAlertsPerDay": 2 }))
        .await;
    h.prices.push("X", &[95.0, 110.0, 95.0, 110.0, 95.0]);

    let mut cycle = engine(&h);
    let mut reports = Vec::new();
    for _ in 0..5 {
        reports.push(cycle.run_cycle().await.unwrap());
        h.clock.advance(Duration::minutes(1));
    }

    assert_eq!(h.notifier.sent().len(), 2);
    assert_eq!(reports[4].notifications, 0);
    assert_eq!(reports[4].suppressed, 1);
    assert_eq!(cycle.throttle().state("X").unwrap().alert_count_today, 2);

    cycle.reset_all_counters();
    assert_eq!(cycle.throttle().state("X").unwrap().alert_count_today, 0);
}

#[tokio::test]
async fn cooldown_holds_back_a_fresh_crossing() {
    let h = Harness::new();
    h.set(STOCKS_KEY, stocks(&[("X", 100.0, 120.0)])).await;
    h.set(POLL_CONFIG_KEY, json!({ "cooldownPeriodMinutes": 5, "maxAlertsPerDay": 10 }))
        .await;
    h.prices.push("X", &[95.0, 130.0]);

    let mut cycle = engine(&h);
    cycle.run_cycle().await.unwrap();
    h.clock.advance(Duration::minutes(1));
    let second = cycle.run_cycle().await.unwrap();

    assert_eq!(h.notifier.sent().len(), 1);
    assert_eq!(second.suppressed, 1);
    assert_eq!(h.activity_count("Skipping notification for X (within cooldown period)"), 1);
}

#[tokio::test]
async fn fetch_failure_skips_only_that_instrument() {
    let h = Harness::new();
    h.set(STOCKS_KEY, stocks(&[("BAD", 10.0, 20.0), ("GOOD", 100.0, 120.0)]))
        .await;
    no_throttle(&h).await;
    h.prices.push("GOOD", &[90.0]);

    let report = engine(&h).run_cycle().await.unwrap();

    assert_eq!(report.failures, 1);
    assert_eq!(report.checked, 1);
    assert_eq!(report.notifications, 1);
    assert_eq!(h.notifier.sent()[0].symbol, "GOOD");
    assert_eq!(h.activity_count("Failed to fetch price for BAD"), 1);
    assert!(h.history.recent_history("BAD").is_empty());
    assert_eq!(h.history.recent_history("GOOD").len(), 1);
}

#[tokio::test]
async fn failed_analysis_still_uses_up_the_cooldown() {
    let h = Harness::with_analyst(CountingAnalyst::failing());
    h.set(STOCKS_KEY, stocks(&[("X", 100.0, 200.0)])).await;
    no_throttle(&h).await;
    h.prices.push("X", &[102.0, 102.0]);

    let mut cycle = engine(&h);
    let first = cycle.run_cycle().await.unwrap();
    assert_eq!(first.analyses, 1);
    assert_eq!(cycle.gate().last_call_time("X"), Some(common::start_time()));

    h.clock.advance(Duration::minutes(1));
    let second = cycle.run_cycle().await.unwrap();
    assert_eq!(second.analyses, 0);
    assert_eq!(h.analyst.calls(), 1);
    assert_eq!(h.activity_count("Cooldown period: 14 minutes left"), 1);
}

#[tokio::test]
async fn analysis_is_logged_with_prompt_and_history() {
    let h = Harness::new();
    h.set(STOCKS_KEY, stocks(&[("X", 100.0, 200.0)])).await;
    no_throttle(&h).await;
    h.prices.push("X", &[103.0]);

    engine(&h).run_cycle().await.unwrap();

    let llm = h.activity.llm_interactions();
    assert_eq!(llm.len(), 1);
    let details = llm[0].details.as_ref().unwrap();
    assert_eq!(details["symbol"], "X");
    assert!(details["request"].as_str().unwrap().contains("| X: 103"));
    assert!(details["response"].as_str().unwrap().contains("closer to lower"));
}

#[tokio::test]
async fn far_prices_never_reach_the_analyst() {
    let h = Harness::new();
    h.set(STOCKS_KEY, stocks(&[("X", 100.0, 200.0)])).await;
    h.prices.push("X", &[150.0]);

    let report = engine(&h).run_cycle().await.unwrap();
    assert_eq!(report.analyses, 0);
    assert_eq!(h.analyst.calls(), 0);
}

#[tokio::test]
async fn idle_notice_is_logged_once() {
    let h = Harness::new();
    let mut cycle = engine(&h);

    for _ in 0..3 {
        cycle.run_cycle().await.unwrap();
    }
    assert_eq!(h.activity_count("No stocks being monitored"), 1);

    // becoming non-empty then empty again logs it once more
    let list = vec![MonitoredInstrument::new("X", 1.0, 2.0)];
    cycle.on_instruments_changed(&[], &list);
    cycle.on_instruments_changed(&list, &[]);
    cycle.run_cycle().await.unwrap();
    assert_eq!(h.activity_count("No stocks being monitored"), 2);
}

#[tokio::test]
async fn removed_symbol_loses_state_and_readd_starts_fresh() {
    let h = Harness::new();
    let list = vec![MonitoredInstrument::new("X", 100.0, 120.0)];
    h.set(STOCKS_KEY, serde_json::to_value(&list).unwrap()).await;
    no_throttle(&h).await;
    h.prices.push("X", &[95.0, 95.0]);

    let mut cycle = engine(&h);
    cycle.run_cycle().await.unwrap();
    assert!(cycle.alerts().state("X").unwrap().below_lower());

    h.set(STOCKS_KEY, json!([])).await;
    cycle.on_instruments_changed(&list, &[]);
    assert!(cycle.alerts().state("X").is_none());
    assert!(h.history.recent_history("X").is_empty());

    h.set(STOCKS_KEY, serde_json::to_value(&list).unwrap()).await;
    cycle.on_instruments_changed(&[], &list);
    h.clock.advance(Duration::minutes(1));
    cycle.run_cycle().await.unwrap();

    assert_eq!(h.notifier.sent().len(), 2);
}

#[tokio::test]
async fn edited_thresholds_reset_alert_state() {
    let h = Harness::new();
    let before = vec![MonitoredInstrument::new("X", 100.0, 120.0)];
    let after = vec![MonitoredInstrument::new("X", 90.0, 120.0)];
    h.set(STOCKS_KEY, serde_json::to_value(&before).unwrap()).await;
    no_throttle(&h).await;
    h.prices.push("X", &[95.0]);

    let mut cycle = engine(&h);
    cycle.run_cycle().await.unwrap();
    assert!(cycle.alerts().state("X").unwrap().below_lower());

    cycle.on_instruments_changed(&before, &after);
    assert!(cycle.alerts().state("X").unwrap().in_normal_range());
    assert_eq!(h.activity_count("Reset alert state for X due to threshold update"), 1);

    // unchanged thresholds leave state alone
    cycle.on_instruments_changed(&after, &after);
    assert_eq!(h.activity_count("Reset alert state for X"), 1);
}

#[tokio::test]
async fn missing_config_uses_defaults() {
    let h = Harness::new();
    h.set(STOCKS_KEY, stocks(&[("X", 100.0, 120.0)])).await;
    h.prices.push("X", &[95.0, 110.0, 95.0]);

    let mut cycle = engine(&h);
    cycle.run_cycle().await.unwrap();
    h.clock.advance(Duration::minutes(1));
    cycle.run_cycle().await.unwrap();
    h.clock.advance(Duration::minutes(1));
    let third = cycle.run_cycle().await.unwrap();

    // default 5 minute cooldown still active
    assert_eq!(h.notifier.sent().len(), 1);
    assert_eq!(third.suppressed, 1);
}

#[tokio::test]
async fn unreadable_instrument_list_aborts_the_cycle() {
    let h = Harness::new();
    h.set(STOCKS_KEY, json!("not a list")).await;

    assert!(engine(&h).run_cycle().await.is_err());
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn throttled_ticks_still_move_the_alert_state() {
    let h = Harness::new();
    h.set(STOCKS_KEY, stocks(&[("X", 100.0, 120.0)])).await;
    h.set(POLL_CONFIG_KEY, json!({ "cooldownPeriodMinutes": 5, "maxAlertsPerDay": 10 }))
        .await;
    h.prices.push("X", &[95.0, 110.0]);

    let mut cycle = engine(&h);
    cycle.run_cycle().await.unwrap();
    h.clock.advance(Duration::minutes(1));
    let second = cycle.run_cycle().await.unwrap();

    // inside the band while the cooldown is still running
    assert_eq!(second.suppressed, 0);
    let state = cycle.alerts().state("X").unwrap();
    assert!(state.in_normal_range());
    assert!(!state.below_lower());
}

#[tokio::test]
async fn crossing_denied_by_cooldown_is_not_replayed_later() {
    let h = Harness::new();
    h.set(STOCKS_KEY, stocks(&[("X", 100.0, 120.0)])).await;
    h.set(POLL_CONFIG_KEY, json!({ "cooldownPeriodMinutes": 5, "maxAlertsPerDay": 10 }))
        .await;
    h.prices.push("X", &[125.0, 95.0, 95.0, 95.0, 95.0, 95.0]);

    let mut cycle = engine(&h);
    let mut suppressed = 0;
    for _ in 0..6 {
        suppressed += cycle.run_cycle().await.unwrap().suppressed;
        h.clock.advance(Duration::minutes(1));
    }

    let kinds: Vec<AlertType> = h.notifier.sent().iter().map(|n| n.alert_type).collect();
    assert_eq!(kinds, vec![AlertType::Upper]);
    assert_eq!(suppressed, 1);
    assert!(cycle.alerts().state("X").unwrap().below_lower());
    assert_eq!(h.activity_count("lower crossing not surfaced"), 1);
}

#[tokio::test]
async fn daily_reset_waits_for_the_engine_lock() {
    let h = Harness::new();
    h.set(STOCKS_KEY, stocks(&[("X", 100.0, 120.0)])).await;
    no_throttle(&h).await;
    h.prices.push("X", &[95.0]);

    let state = h.app_state();
    alert_monitor::run_now(&state).await.unwrap().unwrap();

    let held = state.monitor.lock().await;
    let reset = tokio::spawn({
        let state = state.clone();
        async move { alert_monitor::reset_daily_counters(&state).await }
    });

    tokio::task::yield_now().await;
    assert!(!reset.is_finished());
    assert_eq!(held.throttle().state("X").unwrap().alert_count_today, 1);

    drop(held);
    reset.await.unwrap();

    let monitor = state.monitor.lock().await;
    let counters = monitor.throttle().state("X").unwrap();
    assert_eq!(counters.alert_count_today, 0);
    assert_eq!(counters.last_notification_time, Some(common::start_time()));
}
