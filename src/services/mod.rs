pub mod activity_log;
pub mod alert_monitor;
pub mod alert_state;
pub mod analysis;
pub mod clock;
pub mod config_service;
pub mod finnhub;
pub mod instruments_service;
pub mod notification_throttle;
pub mod notifier;
pub mod poll_cycle;
pub mod price_history;
pub mod price_source;
pub mod storage;
