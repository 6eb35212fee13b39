pub mod alert;
pub mod instrument;
pub mod notification;
pub mod poll_config;
pub mod price;

pub use alert::{AlertDecision, AlertState, AlertType, AlertZone};
pub use instrument::MonitoredInstrument;
pub use notification::Notification;
pub use poll_config::PollConfig;
pub use price::PriceHistoryEntry;
