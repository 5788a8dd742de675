//! Inclusive, evenly spaced sequences between two endpoints.
//!
//! - [`fill_intervals`] — minute-granularity instants between two boundaries
//! - [`dates_between`] — one entry per calendar day, with epoch seconds

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::clock::Clock;
use crate::error::{EngineError, Result};
use crate::format::try_to_text;
use crate::parse::{to_instant, ParseOptions, TimeInput};
use crate::round::{minutes, try_round_to_boundary};
use crate::Instant;

/// Day-level pattern used by [`dates_between`] when none is given.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

// ── fill_intervals ──────────────────────────────────────────────────────────

/// Every `granularity`-minute boundary from `start` to `end`, inclusive.
///
/// `start` is rounded in floor mode and `end` in ceiling mode (see
/// [`crate::round`]). A missing `end` means the clock's current instant, in
/// `start`'s offset.
///
/// On failure the instants accumulated so far are returned, possibly none,
/// and an error is logged.
pub fn fill_intervals(
    start: Instant,
    end: Option<Instant>,
    granularity: u32,
    clock: &dyn Clock,
) -> Vec<Instant> {
    let end = end.unwrap_or_else(|| clock.now().with_timezone(start.offset()));
    let mut intervals = Vec::new();
    if let Err(e) = fill_into(&mut intervals, start, end, granularity) {
        tracing::error!(
            start = %start.to_rfc3339(),
            end = %end.to_rfc3339(),
            granularity,
            generated = intervals.len(),
            error = %e,
            "failed to fill intervals; returning partial result"
        );
    }
    intervals
}

/// Strict form of [`fill_intervals`] with an explicit end.
///
/// # Errors
///
/// Returns [`EngineError::InvalidGranularity`] for `granularity == 0` and
/// [`EngineError::OutOfRange`] if rounding or stepping overflows.
pub fn try_fill_intervals(start: Instant, end: Instant, granularity: u32) -> Result<Vec<Instant>> {
    let mut intervals = Vec::new();
    fill_into(&mut intervals, start, end, granularity)?;
    Ok(intervals)
}

fn fill_into(
    intervals: &mut Vec<Instant>,
    start: Instant,
    end: Instant,
    granularity: u32,
) -> Result<()> {
    let step = Duration::try_minutes(minutes(granularity)?)
        .ok_or(EngineError::InvalidGranularity(granularity))?;
    let first = try_round_to_boundary(start, granularity, false)?;
    let last = try_round_to_boundary(end, granularity, true)?;
    tracing::debug!(
        start = %first.to_rfc3339(),
        end = %last.to_rfc3339(),
        "filling intervals"
    );

    let mut current = first;
    while current <= last {
        intervals.push(current);
        current = current
            .checked_add_signed(step)
            .ok_or_else(|| EngineError::OutOfRange(format!("'{}' + {step}", current.to_rfc3339())))?;
    }
    Ok(())
}

// ── dates_between ───────────────────────────────────────────────────────────

/// A calendar day produced by [`dates_between`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DayEntry {
    /// The day rendered with the day-level pattern.
    Text(String),
    Date(NaiveDate),
}

impl fmt::Display for DayEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayEntry::Text(s) => f.write_str(s),
            DayEntry::Date(d) => write!(f, "{d}"),
        }
    }
}

/// Every calendar day from `start` to `end`, inclusive, with epoch seconds.
///
/// Both endpoints are normalized with [`to_instant`] using `day_format`
/// (the zone and fallback policy come from `options`); a missing `end` means
/// now. Each day's epoch value is obtained by rendering the day with
/// `day_format` and parsing that text back, so it is exactly what
/// [`to_instant`] yields for the day string.
///
/// With `as_string` the first sequence holds [`DayEntry::Text`], otherwise
/// [`DayEntry::Date`]. If a day cannot be rendered the walk stops there and
/// the partial result is returned with an error logged.
///
/// # Examples
///
/// ```
/// use tempokit::clock::SystemClock;
/// use tempokit::interval::{dates_between, DAY_FORMAT};
/// use tempokit::parse::ParseOptions;
///
/// let (days, epochs) = dates_between(
///     "2024-01-01",
///     Some("2024-01-03".into()),
///     DAY_FORMAT,
///     true,
///     &ParseOptions::default(),
///     &SystemClock,
/// );
/// assert_eq!(days.len(), 3);
/// assert_eq!(epochs[1] - epochs[0], 86_400);
/// ```
pub fn dates_between<'a>(
    start: impl Into<TimeInput<'a>>,
    end: Option<TimeInput<'a>>,
    day_format: &str,
    as_string: bool,
    options: &ParseOptions,
    clock: &dyn Clock,
) -> (Vec<DayEntry>, Vec<i64>) {
    let day_options = options.clone().with_format(day_format);
    let start = to_instant(start, &day_options, clock).instant();
    let end = match end {
        Some(end) => to_instant(end, &day_options, clock).instant(),
        None => day_options.zone.now(clock),
    };

    let mut dates = Vec::new();
    let mut epochs = Vec::new();
    let mut current = start;
    while current <= end {
        let text = match try_to_text(&current, day_format) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    day = %current.to_rfc3339(),
                    format = day_format,
                    error = %e,
                    "failed to render day; returning partial result"
                );
                break;
            }
        };
        epochs.push(to_instant(text.as_str(), &day_options, clock).instant().timestamp());
        dates.push(if as_string {
            DayEntry::Text(text)
        } else {
            DayEntry::Date(current.date_naive())
        });

        // Step the wall clock, not 24 hours, so DST transitions keep midnight.
        let next = current
            .naive_local()
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| EngineError::OutOfRange(format!("'{}' + 1 day", current.to_rfc3339())))
            .and_then(|naive| day_options.zone.attach(&naive));
        current = match next {
            Ok(next) => next,
            Err(e) => {
                tracing::error!(
                    day = %current.to_rfc3339(),
                    error = %e,
                    "failed to step to next day; returning partial result"
                );
                break;
            }
        };
    }
    (dates, epochs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::zone::TargetZone;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(s: &str) -> Instant {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 12, 30).unwrap())
    }

    fn hm(intervals: &[Instant]) -> Vec<String> {
        intervals.iter().map(|t| t.format("%H:%M").to_string()).collect()
    }

    // ── fill_intervals ──────────────────────────────────────────────────

    #[test]
    fn test_fill_rounds_both_endpoints() {
        let intervals = fill_intervals(
            at("2024-01-01T00:00:00Z"),
            Some(at("2024-01-01T00:10:00Z")),
            5,
            &clock(),
        );
        // Floor mode moves the start to the next boundary; the end stays.
        assert_eq!(hm(&intervals), ["00:05", "00:10"]);
    }

    #[test]
    fn test_fill_is_inclusive_of_rounded_end() {
        let intervals = fill_intervals(
            at("2024-01-01T10:52:13Z"),
            Some(at("2024-01-01T11:07:00Z")),
            5,
            &clock(),
        );
        assert_eq!(hm(&intervals), ["10:55", "11:00", "11:05"]);
    }

    #[test]
    fn test_fill_evenly_spaced() {
        let intervals = fill_intervals(
            at("2024-01-01T08:03:00Z"),
            Some(at("2024-01-01T10:00:00Z")),
            10,
            &clock(),
        );
        assert_eq!(intervals.first(), Some(&at("2024-01-01T08:10:00Z")));
        assert_eq!(intervals.last(), Some(&at("2024-01-01T10:00:00Z")));
        assert!(intervals
            .windows(2)
            .all(|w| w[1] - w[0] == Duration::minutes(10)));
    }

    #[test]
    fn test_fill_defaults_end_to_now() {
        let intervals = fill_intervals(at("2024-01-01T00:00:00Z"), None, 5, &clock());
        // now = 00:12:30, ceiling-rounded to 00:10.
        assert_eq!(hm(&intervals), ["00:05", "00:10"]);
    }

    #[test]
    fn test_fill_end_before_start_is_empty() {
        let intervals = fill_intervals(
            at("2024-01-01T10:00:00Z"),
            Some(at("2024-01-01T09:00:00Z")),
            5,
            &clock(),
        );
        assert!(intervals.is_empty());
    }

    #[test]
    fn test_fill_zero_granularity_is_empty() {
        let start = at("2024-01-01T10:00:00Z");
        assert!(fill_intervals(start, Some(start), 0, &clock()).is_empty());
        assert_eq!(
            try_fill_intervals(start, start, 0).unwrap_err(),
            EngineError::InvalidGranularity(0)
        );
    }

    #[test]
    fn test_fill_across_offsets_compares_absolutely() {
        // 10:00+02:00 is 08:00Z.
        let intervals = fill_intervals(
            at("2024-01-01T07:50:00Z"),
            Some(at("2024-01-01T10:00:00+02:00")),
            5,
            &clock(),
        );
        assert_eq!(hm(&intervals), ["07:55", "08:00"]);
    }

    // ── dates_between ───────────────────────────────────────────────────

    #[test]
    fn test_dates_between_inclusive_strings() {
        let (days, epochs) = dates_between(
            "2024-01-01",
            Some("2024-01-03".into()),
            DAY_FORMAT,
            true,
            &ParseOptions::default(),
            &clock(),
        );
        let days: Vec<String> = days.iter().map(ToString::to_string).collect();
        assert_eq!(days, ["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(epochs, [1_704_067_200, 1_704_153_600, 1_704_240_000]);
    }

    #[test]
    fn test_dates_between_structured_dates() {
        let (days, epochs) = dates_between(
            "2024-02-28",
            Some("2024-03-01".into()),
            DAY_FORMAT,
            false,
            &ParseOptions::default(),
            &clock(),
        );
        assert_eq!(
            days,
            [
                DayEntry::Date(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()),
                DayEntry::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
                DayEntry::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            ]
        );
        assert_eq!(epochs.len(), 3);
    }

    #[test]
    fn test_dates_between_epochs_follow_zone() {
        let zone: TargetZone = "+05:00".parse().unwrap();
        let opts = ParseOptions::default().with_zone(zone);
        let (_, epochs) = dates_between(
            "2024-01-01",
            Some("2024-01-02".into()),
            DAY_FORMAT,
            true,
            &opts,
            &clock(),
        );
        assert_eq!(epochs, [1_704_067_200 - 5 * 3600, 1_704_153_600 - 5 * 3600]);
    }

    #[test]
    fn test_dates_between_across_dst_transition() {
        // Berlin springs forward on 2024-03-31; that day is 23 hours long.
        let opts = ParseOptions::default().with_zone(TargetZone::Named(chrono_tz::Europe::Berlin));
        let (days, epochs) = dates_between(
            "2024-03-30",
            Some("2024-04-01".into()),
            DAY_FORMAT,
            true,
            &opts,
            &clock(),
        );
        let days: Vec<String> = days.iter().map(ToString::to_string).collect();
        assert_eq!(days, ["2024-03-30", "2024-03-31", "2024-04-01"]);
        assert_eq!(epochs, [1_711_753_200, 1_711_839_600, 1_711_922_400]);
    }

    #[test]
    fn test_dates_between_across_fall_back() {
        // Berlin falls back on 2024-10-27; that day is 25 hours long.
        let opts = ParseOptions::default().with_zone(TargetZone::Named(chrono_tz::Europe::Berlin));
        let (days, epochs) = dates_between(
            "2024-10-26",
            Some("2024-10-28".into()),
            DAY_FORMAT,
            true,
            &opts,
            &clock(),
        );
        assert_eq!(days.len(), 3);
        assert_eq!(epochs[2] - epochs[1], 25 * 3600);
    }

    #[test]
    fn test_dates_between_single_day() {
        let (days, epochs) = dates_between(
            "2024-01-05",
            Some("2024-01-05".into()),
            DAY_FORMAT,
            true,
            &ParseOptions::default(),
            &clock(),
        );
        assert_eq!(days, [DayEntry::Text("2024-01-05".to_string())]);
        assert_eq!(epochs.len(), 1);
    }

    #[test]
    fn test_dates_between_reversed_is_empty() {
        let (days, epochs) = dates_between(
            "2024-01-05",
            Some("2024-01-01".into()),
            DAY_FORMAT,
            true,
            &ParseOptions::default(),
            &clock(),
        );
        assert!(days.is_empty());
        assert!(epochs.is_empty());
    }

    #[test]
    fn test_dates_between_defaults_end_to_now() {
        // now is 2024-01-01T00:12:30Z
        let (days, _) = dates_between(
            "2023-12-30",
            None,
            DAY_FORMAT,
            true,
            &ParseOptions::default(),
            &clock(),
        );
        let days: Vec<String> = days.iter().map(ToString::to_string).collect();
        assert_eq!(days, ["2023-12-30", "2023-12-31", "2024-01-01"]);
    }

    #[test]
    fn test_dates_between_custom_day_format() {
        let (days, epochs) = dates_between(
            "01/01/2024",
            Some("02/01/2024".into()),
            "%d/%m/%Y",
            true,
            &ParseOptions::default(),
            &clock(),
        );
        assert_eq!(
            days,
            [
                DayEntry::Text("01/01/2024".to_string()),
                DayEntry::Text("02/01/2024".to_string())
            ]
        );
        assert_eq!(epochs[1] - epochs[0], 86_400);
    }
}
