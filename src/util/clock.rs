//! Wall-clock helpers.

use std::time::{SystemTime, UNIX_EPOCH};

const SECS_PER_DAY: i64 = 86_400;

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Seconds since the Unix epoch.
pub fn now_secs() -> i64 {
    now_ms() / 1000
}

/// Time reference for one scheduling turn, in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnClock {
    /// Current time.
    pub current_timestamp: i64,
    /// Local midnight that starts the current day.
    pub midnight_timestamp: i64,
}

impl TurnClock {
    /// Build a clock for `current_timestamp`, deriving local midnight from a
    /// fixed UTC offset.
    pub const fn at(current_timestamp: i64, utc_offset_secs: i64) -> Self {
        let local = current_timestamp + utc_offset_secs;
        let local_midnight = local - local.rem_euclid(SECS_PER_DAY);
        Self {
            current_timestamp,
            midnight_timestamp: local_midnight - utc_offset_secs,
        }
    }

    /// Clock for the current wall time.
    pub fn now(utc_offset_secs: i64) -> Self {
        Self::at(now_secs(), utc_offset_secs)
    }

    /// Seconds elapsed since local midnight.
    pub const fn seconds_since_midnight(&self) -> i64 {
        self.current_timestamp - self.midnight_timestamp
    }
}
