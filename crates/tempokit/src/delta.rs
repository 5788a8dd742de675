//! Epoch timestamps and distances between normalized values.

use chrono::{DateTime, Duration};

use crate::clock::Clock;
use crate::parse::{to_instant, ParseOptions, TimeInput};
use crate::zone::TargetZone;
use crate::Instant;

const SECONDS_PER_DAY: i64 = 86_400;

/// Epoch seconds of `value` after normalization (fallbacks included).
pub fn to_timestamp<'a>(
    value: impl Into<TimeInput<'a>>,
    options: &ParseOptions,
    clock: &dyn Clock,
) -> i64 {
    to_instant(value, options, clock).instant().timestamp()
}

/// The instant `seconds` after the epoch, expressed in `zone`.
///
/// Returns `None` if `seconds` is outside chrono's representable range.
pub fn timestamp_to_instant(seconds: i64, zone: &TargetZone) -> Option<Instant> {
    DateTime::from_timestamp(seconds, 0).map(|utc| zone.convert(&utc))
}

/// Absolute number of seconds between `start` and `end` (default: now).
pub fn time_delta<'a>(
    start: impl Into<TimeInput<'a>>,
    end: Option<TimeInput<'a>>,
    options: &ParseOptions,
    clock: &dyn Clock,
) -> f64 {
    let (start, end) = endpoints(start.into(), end, options, clock);
    let delta = (end - start).abs();
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

/// Whole days from `start` to `end` (default: now), rounded toward negative
/// infinity: one second before `start` is `-1`.
pub fn delta_days<'a>(
    start: impl Into<TimeInput<'a>>,
    end: Option<TimeInput<'a>>,
    options: &ParseOptions,
    clock: &dyn Clock,
) -> i64 {
    let (start, end) = endpoints(start.into(), end, options, clock);
    (end - start).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// `now` minus `days` days; `0` returns `now` unchanged.
pub fn days_ago(days: u32, now: Instant) -> Instant {
    match now.checked_sub_signed(Duration::days(i64::from(days))) {
        Some(past) => past,
        None => {
            tracing::warn!(days, now = %now.to_rfc3339(), "days ago is out of range; using now");
            now
        }
    }
}

fn endpoints(
    start: TimeInput<'_>,
    end: Option<TimeInput<'_>>,
    options: &ParseOptions,
    clock: &dyn Clock,
) -> (Instant, Instant) {
    let start = to_instant(start, options, clock).instant();
    let end = match end {
        Some(end) => to_instant(end, options, clock).instant(),
        None => options.zone.now(clock),
    };
    (start, end)
}
