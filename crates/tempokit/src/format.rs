//! Rendering instants back to text.
//!
//! Patterns are chrono strftime descriptors. They are validated before use,
//! so a malformed pattern is reported as [`EngineError::InvalidFormat`]
//! instead of panicking inside `Display`.

use std::fmt::{Display, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};

use crate::error::{EngineError, Result};

/// Render `instant` with `format`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidFormat`] if the pattern contains an unknown
/// directive or asks for a field the value cannot supply.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use tempokit::format::try_to_text;
///
/// let t = DateTime::parse_from_rfc3339("2024-01-01T10:07:00+02:00").unwrap();
/// assert_eq!(try_to_text(&t, "%Y-%m-%d %H:%M %z").unwrap(), "2024-01-01 10:07 +0200");
/// ```
pub fn try_to_text<Tz>(instant: &DateTime<Tz>, format: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let items = compile(format)?;
    let mut out = String::new();
    write!(out, "{}", instant.format_with_items(items.iter()))
        .map_err(|_| EngineError::InvalidFormat(format!("cannot render with '{format}'")))?;
    Ok(out)
}

/// Render `instant` with `format`, or `None` (logged) on failure.
pub fn to_text<Tz>(instant: &DateTime<Tz>, format: &str) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match try_to_text(instant, format) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!(format, error = %e, "failed to format datetime");
            None
        }
    }
}

/// Render `instant` after converting it to UTC.
///
/// Use this wherever the text must not depend on the instant's offset
/// (cache keys, file names, API payloads).
pub fn to_utc_text<Tz>(instant: &DateTime<Tz>, format: &str) -> Option<String>
where
    Tz: TimeZone,
{
    to_text(&instant.with_timezone(&Utc), format)
}

/// Parse a pattern into strftime items, rejecting unknown directives.
pub(crate) fn compile(format: &str) -> Result<Vec<Item<'_>>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(EngineError::InvalidFormat(format!("'{format}'")));
    }
    Ok(items)
}
