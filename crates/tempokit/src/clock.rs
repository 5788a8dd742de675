//! The "now" source and now-relative helpers.
//!
//! Every now-relative default in this crate (parse fallbacks, the open end of
//! an interval range) reads the current instant through a [`Clock`], so tests
//! can pin it with a [`FixedClock`].

use chrono::{DateTime, Timelike, Utc};

use crate::zone::TargetZone;
use crate::Instant;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the OS clock via `chrono::Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Current instant in UTC.
pub fn utc_now(clock: &dyn Clock) -> Instant {
    TargetZone::Utc.now(clock)
}

/// Current instant in UTC with seconds and sub-seconds zeroed.
pub fn utc_now_minute(clock: &dyn Clock) -> Instant {
    let now = utc_now(clock);
    // Zeroing seconds never leaves the valid range.
    now.with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(now)
}

/// Current instant expressed in `zone`.
pub fn time_now(zone: &TargetZone, clock: &dyn Clock) -> Instant {
    zone.now(clock)
}

/// The conventional "no date" placeholder: 2000-01-01T00:00:00Z.
pub fn default_date() -> Instant {
    const Y2K: i64 = 946_684_800;
    DateTime::from_timestamp(Y2K, 0)
        .unwrap_or_default()
        .fixed_offset()
}
