//! Snapping instants to minute-granularity boundaries.
//!
//! # Rounding modes
//!
//! For minute `m` and granularity `g` the target minute is
//! `(m / g + step) * g`, where `step` is `1` in floor mode (`ceil = false`)
//! and `0` in ceiling mode. Floor mode therefore lands on the boundary
//! *after* the truncated one, and ceiling mode on the truncated boundary
//! itself. Existing callers depend on this naming, so it is kept as is.
//!
//! | input | g | ceil  | result |
//! |-------|---|-------|--------|
//! | 10:07 | 5 | false | 10:10  |
//! | 10:07 | 5 | true  | 10:05  |
//! | 10:55 | 5 | false | 11:00  |
//!
//! Seconds and sub-seconds are always zeroed.

use chrono::{Duration, Timelike};

use crate::error::{EngineError, Result};
use crate::Instant;

/// Round `instant` to a `granularity`-minute boundary.
///
/// On failure (zero granularity, arithmetic overflow) the input is returned
/// unchanged and a warning is logged.
pub fn round_to_boundary(instant: Instant, granularity: u32, ceil: bool) -> Instant {
    match try_round_to_boundary(instant, granularity, ceil) {
        Ok(rounded) => rounded,
        Err(e) => {
            tracing::warn!(
                date = %instant.to_rfc3339(),
                granularity,
                ceil,
                error = %e,
                "failed to round date; returning original"
            );
            instant
        }
    }
}

/// Strict form of [`round_to_boundary`].
///
/// # Errors
///
/// Returns [`EngineError::InvalidGranularity`] for `granularity == 0` and
/// [`EngineError::OutOfRange`] if the shifted instant overflows.
pub fn try_round_to_boundary(instant: Instant, granularity: u32, ceil: bool) -> Result<Instant> {
    let granularity = minutes(granularity)?;
    let minute = i64::from(instant.minute());
    let step = if ceil { 0 } else { 1 };
    let target = (minute / granularity + step) * granularity;

    let shifted = Duration::try_minutes(target - minute)
        .and_then(|delta| instant.checked_add_signed(delta))
        .ok_or_else(|| out_of_range(&instant))?;
    let rounded = truncate_to_minute(shifted)?;

    tracing::debug!(
        original = %instant.to_rfc3339(),
        rounded = %rounded.to_rfc3339(),
        "rounded date"
    );
    Ok(rounded)
}

/// The last fully elapsed minute: seconds zeroed, then one minute back.
///
/// On overflow the input is returned unchanged and a warning is logged.
pub fn round_down_one_minute(instant: Instant) -> Instant {
    let stepped = truncate_to_minute(instant).and_then(|floored| {
        floored
            .checked_sub_signed(Duration::minutes(1))
            .ok_or_else(|| out_of_range(&floored))
    });
    match stepped {
        Ok(stepped) => stepped,
        Err(e) => {
            tracing::warn!(
                date = %instant.to_rfc3339(),
                error = %e,
                "failed to step back one minute; returning original"
            );
            instant
        }
    }
}

/// Granularity as a signed minute count, rejecting zero.
pub(crate) fn minutes(granularity: u32) -> Result<i64> {
    if granularity == 0 {
        return Err(EngineError::InvalidGranularity(granularity));
    }
    Ok(i64::from(granularity))
}

fn truncate_to_minute(instant: Instant) -> Result<Instant> {
    instant
        .with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .ok_or_else(|| out_of_range(&instant))
}

fn out_of_range(instant: &Instant) -> EngineError {
    EngineError::OutOfRange(format!("'{}'", instant.to_rfc3339()))
}
