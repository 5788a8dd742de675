//! Normalizing heterogeneous timestamp input into offset-aware instants.
//!
//! [`to_instant`] never fails: when the input cannot be parsed it returns a
//! [`Normalized::Fallback`] chosen by the [`FallbackPolicy`] and logs a
//! warning. [`try_to_instant`] is the strict core and reports the error.
//!
//! # Zone attachment
//!
//! Values that already carry an offset keep it, unless `force_zone` is set,
//! in which case the target zone is attached to their wall-clock time.
//! Offset-less values always receive the target zone.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use chrono::format::ParseErrorKind;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::zone::TargetZone;
use crate::{Instant, DEFAULT_FORMAT};

/// More than six fractional digits, followed by an optional offset/zone
/// suffix that ends the text.
static OVERPRECISE_FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.(\d{6})\d+(\s*(?:[Zz]|[+-]\d{2}(?::?\d{2})?|[A-Za-z][A-Za-z_/+-]*)?)$")
        .expect("fraction pattern is valid")
});

// ── Inputs and outcomes ─────────────────────────────────────────────────────

/// A timestamp-like value accepted by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput<'a> {
    /// Text to parse against a format descriptor.
    Text(&'a str),
    /// A structured value that already carries an offset.
    Zoned(Instant),
    /// A structured value without an offset.
    Naive(NaiveDateTime),
    /// A calendar day; interpreted as its midnight.
    Day(NaiveDate),
}

impl<'a> From<&'a str> for TimeInput<'a> {
    fn from(s: &'a str) -> Self {
        TimeInput::Text(s)
    }
}

impl<'a> From<&'a String> for TimeInput<'a> {
    fn from(s: &'a String) -> Self {
        TimeInput::Text(s.as_str())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TimeInput<'_> {
    fn from(dt: DateTime<Tz>) -> Self {
        TimeInput::Zoned(dt.fixed_offset())
    }
}

impl From<NaiveDateTime> for TimeInput<'_> {
    fn from(naive: NaiveDateTime) -> Self {
        TimeInput::Naive(naive)
    }
}

impl From<NaiveDate> for TimeInput<'_> {
    fn from(day: NaiveDate) -> Self {
        TimeInput::Day(day)
    }
}

impl fmt::Display for TimeInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInput::Text(s) => write!(f, "{s:?}"),
            TimeInput::Zoned(dt) => write!(f, "{}", dt.to_rfc3339()),
            TimeInput::Naive(naive) => write!(f, "{naive}"),
            TimeInput::Day(day) => write!(f, "{day}"),
        }
    }
}

/// What to return when parsing fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// The clock's current instant in the target zone.
    #[default]
    Now,
    /// A caller-supplied instant, returned unchanged.
    Literal(Instant),
}

/// The outcome of [`to_instant`].
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// The input was parsed cleanly.
    Parsed(Instant),
    /// The input could not be parsed; `instant` came from the fallback policy.
    Fallback {
        instant: Instant,
        reason: EngineError,
    },
}

impl Normalized {
    /// The resulting instant, parsed or defaulted.
    pub fn instant(&self) -> Instant {
        match self {
            Normalized::Parsed(instant) | Normalized::Fallback { instant, .. } => *instant,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Normalized::Fallback { .. })
    }

    /// The parse error, if the fallback was taken.
    pub fn reason(&self) -> Option<&EngineError> {
        match self {
            Normalized::Parsed(_) => None,
            Normalized::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Per-call parser settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// strftime pattern for text input.
    pub format: String,
    /// Zone attached to offset-less values.
    pub zone: TargetZone,
    /// Attach `zone` even to values that already carry an offset.
    pub force_zone: bool,
    pub fallback: FallbackPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            zone: TargetZone::Utc,
            force_zone: false,
            fallback: FallbackPolicy::Now,
        }
    }
}

impl ParseOptions {
    /// Options seeded from the process configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTimezone`] if the configured zone is invalid.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            format: config.datetime_format.clone(),
            zone: config.zone()?,
            ..Self::default()
        })
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_zone(mut self, zone: TargetZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_force_zone(mut self, force: bool) -> Self {
        self.force_zone = force;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Normalize `value` into an offset-aware instant, falling back on failure.
///
/// # Examples
///
/// ```
/// use tempokit::clock::SystemClock;
/// use tempokit::parse::{to_instant, ParseOptions};
///
/// let opts = ParseOptions::default().with_format("%Y-%m-%dT%H:%M:%S%.6fZ");
/// let parsed = to_instant("2024-01-01T10:00:00.123456789Z", &opts, &SystemClock);
/// assert!(!parsed.is_fallback());
/// assert_eq!(parsed.instant().to_rfc3339(), "2024-01-01T10:00:00.123456+00:00");
/// ```
pub fn to_instant<'a>(
    value: impl Into<TimeInput<'a>>,
    options: &ParseOptions,
    clock: &dyn Clock,
) -> Normalized {
    let value = value.into();
    match try_to_instant(&value, &options.format, &options.zone, options.force_zone) {
        Ok(instant) => Normalized::Parsed(instant),
        Err(reason) => {
            let instant = match options.fallback {
                FallbackPolicy::Now => options.zone.now(clock),
                FallbackPolicy::Literal(literal) => literal,
            };
            tracing::warn!(
                value = %value,
                format = %options.format,
                fallback = %instant.to_rfc3339(),
                error = %reason,
                "failed to convert datetime; using fallback"
            );
            Normalized::Fallback { instant, reason }
        }
    }
}

/// Normalize `value` into an offset-aware instant.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDatetime`] if text does not match `format`
/// (or the resulting local time does not exist in `zone`), and
/// [`EngineError::InvalidFormat`] if `format` itself is malformed.
pub fn try_to_instant(
    value: &TimeInput<'_>,
    format: &str,
    zone: &TargetZone,
    force_zone: bool,
) -> Result<Instant> {
    match value {
        TimeInput::Zoned(dt) if force_zone => zone.attach(&dt.naive_local()),
        TimeInput::Zoned(dt) => Ok(*dt),
        TimeInput::Naive(naive) => zone.attach(naive),
        TimeInput::Day(day) => zone.attach(&day.and_time(NaiveTime::MIN)),
        TimeInput::Text(text) => parse_text(text, format, zone, force_zone),
    }
}

/// Attach `zone` to the wall-clock time of `instant`, discarding its offset.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDatetime`] if the wall-clock time does not
/// exist in `zone`.
pub fn set_zone(instant: &Instant, zone: &TargetZone) -> Result<Instant> {
    zone.attach(&instant.naive_local())
}

/// Truncate more than six fractional-second digits down to six.
///
/// Only a fraction that ends the text, optionally followed by an offset or
/// zone suffix, is touched. Excess digits are dropped, not rounded.
///
/// ```
/// use tempokit::parse::truncate_fraction;
///
/// assert_eq!(truncate_fraction("10:00:00.123456789Z"), "10:00:00.123456Z");
/// assert_eq!(truncate_fraction("10:00:00.1234Z"), "10:00:00.1234Z");
/// ```
pub fn truncate_fraction(text: &str) -> Cow<'_, str> {
    OVERPRECISE_FRACTION.replace(text, ".${1}${2}")
}

fn parse_text(text: &str, format: &str, zone: &TargetZone, force_zone: bool) -> Result<Instant> {
    crate::format::compile(format)?;
    let text = truncate_fraction(text.trim());
    let text = text.as_ref();

    // Formats with an offset directive produce an aware value; without one
    // chrono reports `NotEnough` and we retry as naive datetime, then as day.
    let aware_err = match DateTime::parse_from_str(text, format) {
        Ok(dt) if force_zone => return zone.attach(&dt.naive_local()),
        Ok(dt) => return Ok(dt),
        Err(e) => e,
    };
    if aware_err.kind() != ParseErrorKind::NotEnough {
        return Err(parse_error(text, format, aware_err));
    }

    let naive_err = match NaiveDateTime::parse_from_str(text, format) {
        Ok(naive) => return zone.attach(&naive),
        Err(e) => e,
    };
    if naive_err.kind() != ParseErrorKind::NotEnough {
        return Err(parse_error(text, format, naive_err));
    }

    NaiveDate::parse_from_str(text, format)
        .map_err(|e| parse_error(text, format, e))
        .and_then(|day| zone.attach(&day.and_time(NaiveTime::MIN)))
}

fn parse_error(text: &str, format: &str, err: chrono::ParseError) -> EngineError {
    if err.kind() == ParseErrorKind::BadFormat {
        EngineError::InvalidFormat(format!("'{format}': {err}"))
    } else {
        EngineError::InvalidDatetime(format!("'{text}' with format '{format}': {err}"))
    }
}
