use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

/// Source of "now" for every cooldown and timestamp computed by the engine.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, t: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = t;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Time left until the next local midnight after `now`.
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let tz = now.timezone();
    let midnight = now
        .date_naive()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0));

    // a DST gap can swallow midnight; fall back to the first valid instant
    let next = midnight.and_then(|m| {
        tz.from_local_datetime(&m)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(m + Duration::hours(1))).earliest())
    });

    match next {
        Some(next) => (next.with_timezone(&Utc) - now.with_timezone(&Utc)).max(Duration::zero()),
        None => Duration::hours(24),
    }
}

pub fn until_next_local_midnight() -> Duration {
    until_next_midnight(&Local::now())
}

/// Whether the reset armed for `target` should run on `today`. A late
/// wake-up (suspend, stalled runtime) still counts; an early one does not.
pub fn reset_due(target: NaiveDate, today: NaiveDate) -> bool {
    today >= target
}
