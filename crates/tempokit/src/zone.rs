//! Target zones attached to offset-less values.
//!
//! A [`TargetZone`] is what the parser attaches to a naive datetime, and what
//! "now"-relative defaults are expressed in. It is either UTC, a fixed offset,
//! or a named IANA zone whose offset depends on the local wall-clock time.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::clock::Clock;
use crate::error::{EngineError, Result};
use crate::Instant;

/// The zone attached to naive values and used for "now" defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetZone {
    /// UTC (`+00:00`).
    #[default]
    Utc,
    /// A fixed offset from UTC, e.g. `+05:30`.
    Fixed(FixedOffset),
    /// A named IANA zone, e.g. `Europe/Berlin`.
    Named(Tz),
}

impl TargetZone {
    /// Attach this zone to a wall-clock datetime.
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earliest mapping.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDatetime`] if the local time does not
    /// exist in a named zone (DST spring-forward gap).
    pub fn attach(&self, naive: &NaiveDateTime) -> Result<Instant> {
        match self {
            TargetZone::Utc => Ok(Utc.from_utc_datetime(naive).fixed_offset()),
            TargetZone::Fixed(offset) => offset.from_local_datetime(naive).single().ok_or_else(
                || EngineError::InvalidDatetime(format!("'{naive}' is not representable at {offset}")),
            ),
            TargetZone::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&dt.offset().fix()))
                .ok_or_else(|| {
                    EngineError::InvalidDatetime(format!(
                        "'{naive}' does not exist in {}",
                        tz.name()
                    ))
                }),
        }
    }

    /// Express an absolute instant in this zone.
    pub fn convert(&self, dt: &DateTime<Utc>) -> Instant {
        match self {
            TargetZone::Utc => dt.fixed_offset(),
            TargetZone::Fixed(offset) => dt.with_timezone(offset),
            TargetZone::Named(tz) => {
                let local = dt.with_timezone(tz);
                local.with_timezone(&local.offset().fix())
            }
        }
    }

    /// The clock's current instant expressed in this zone.
    pub fn now(&self, clock: &dyn Clock) -> Instant {
        self.convert(&clock.now())
    }
}

impl fmt::Display for TargetZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetZone::Utc => f.write_str("UTC"),
            TargetZone::Fixed(offset) => write!(f, "{offset}"),
            TargetZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for TargetZone {
    type Err = EngineError;

    /// Accepts `UTC`/`Z`, a `±HH:MM` / `±HHMM` / `±HH` offset, or an IANA name.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("z") {
            return Ok(TargetZone::Utc);
        }
        if s.starts_with('+') || s.starts_with('-') {
            return parse_fixed_offset(s).map(TargetZone::Fixed);
        }
        s.parse::<Tz>()
            .map(TargetZone::Named)
            .map_err(|_| EngineError::InvalidTimezone(format!("'{s}'")))
    }
}

/// Parse `±HH:MM`, `±HHMM` or `±HH` into a [`FixedOffset`].
fn parse_fixed_offset(s: &str) -> Result<FixedOffset> {
    let invalid = || EngineError::InvalidTimezone(format!("'{s}'"));

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        2 => (&digits[..2], "0"),
        4 => (&digits[..2], &digits[2..]),
        _ => return Err(invalid()),
    };

    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
