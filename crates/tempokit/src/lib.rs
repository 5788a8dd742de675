//! # tempokit
//!
//! Offset-aware timestamp normalization and interval generation.
//!
//! Every value this crate produces is a [`chrono::DateTime<FixedOffset>`]
//! carrying an explicit offset. The lenient operations never fail: they
//! degrade to a documented default and log through `tracing`. Each has a
//! strict `try_*` counterpart returning [`EngineError`].
//!
//! ## Modules
//!
//! - [`parse`] — text or structured input → offset-aware instant, with fallback policy
//! - [`round`] — snap to minute-granularity boundaries, last-elapsed-minute cursor
//! - [`interval`] — inclusive minute intervals and calendar-day walks
//! - [`format`] — instant → text, plus the UTC-biased variant
//! - [`delta`] — epoch timestamps, distances in seconds and days
//! - [`clock`] — the "now" source and now-relative helpers
//! - [`zone`] — target zones for offset-less values
//! - [`config`] — process-wide defaults
//! - [`error`] — Error types

use chrono::{DateTime, FixedOffset};

pub mod clock;
pub mod config;
pub mod delta;
pub mod error;
pub mod format;
pub mod interval;
pub mod parse;
pub mod round;
pub mod zone;

/// An offset-aware point in time.
pub type Instant = DateTime<FixedOffset>;

/// Canonical datetime pattern: `YYYY-MM-DD HH:MM:SS.ffffff +ZZZZ`.
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f %z";

pub use clock::{default_date, time_now, utc_now, utc_now_minute, Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use delta::{days_ago, delta_days, time_delta, timestamp_to_instant, to_timestamp};
pub use error::{EngineError, Result};
pub use format::{to_text, to_utc_text, try_to_text};
pub use interval::{dates_between, fill_intervals, try_fill_intervals, DayEntry, DAY_FORMAT};
pub use parse::{
    set_zone, to_instant, truncate_fraction, try_to_instant, FallbackPolicy, Normalized,
    ParseOptions, TimeInput,
};
pub use round::{round_down_one_minute, round_to_boundary, try_round_to_boundary};
pub use zone::TargetZone;
