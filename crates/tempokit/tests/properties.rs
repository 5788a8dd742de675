use chrono::{DateTime, Duration, FixedOffset, TimeZone, Timelike, Utc};
use proptest::prelude::*;

use tempokit::{
    fill_intervals, round_to_boundary, to_instant, to_text, FixedClock, Instant, ParseOptions,
    TargetZone, DEFAULT_FORMAT,
};

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
}

/// Instants between 1970 and ~2096 with microsecond precision and a
/// whole-minute offset.
fn instant() -> impl Strategy<Value = Instant> {
    (0i64..4_000_000_000, 0u32..1_000_000, -720i32..=840).prop_map(|(secs, micros, offset)| {
        let offset = FixedOffset::east_opt(offset * 60).unwrap();
        DateTime::from_timestamp(secs, micros * 1000)
            .unwrap()
            .with_timezone(&offset)
    })
}

proptest! {
    #[test]
    fn default_format_round_trips(t in instant()) {
        let text = to_text(&t, DEFAULT_FORMAT).unwrap();
        let parsed = to_instant(text.as_str(), &ParseOptions::default(), &clock());
        prop_assert!(!parsed.is_fallback());
        let instant = parsed.instant();
        prop_assert_eq!(instant, t);
        prop_assert_eq!(instant.offset(), t.offset());
    }

    #[test]
    fn normalization_is_idempotent(t in instant(), zone_minutes in -720i32..=840) {
        let zone = TargetZone::Fixed(FixedOffset::east_opt(zone_minutes * 60).unwrap());
        let opts = ParseOptions::default()
            .with_format("%Y-%m-%dT%H:%M:%S%.6f")
            .with_zone(zone);
        let text = to_text(&t, "%Y-%m-%dT%H:%M:%S%.6f").unwrap();
        let once = to_instant(text.as_str(), &opts, &clock()).instant();
        let twice = to_instant(once, &opts, &clock()).instant();
        prop_assert_eq!(once, twice);
        prop_assert_eq!(once.offset(), twice.offset());
    }

    #[test]
    fn garbage_never_panics(s in "\\PC{0,40}") {
        let opts = ParseOptions::default().with_format("%Y-%m-%d");
        let _ = to_instant(s.as_str(), &opts, &clock());
    }

    #[test]
    fn rounding_lands_on_a_minute(t in instant(), g in 1u32..=120, ceil in any::<bool>()) {
        let rounded = round_to_boundary(t, g, ceil);
        prop_assert_eq!(rounded.second(), 0);
        prop_assert_eq!(rounded.nanosecond(), 0);
        prop_assert_eq!(rounded.offset(), t.offset());
    }

    #[test]
    fn ceiling_mode_is_never_later(t in instant(), g in 1u32..=60) {
        let rounded = round_to_boundary(t, g, true);
        prop_assert!(rounded <= t);
        prop_assert!(t - rounded < Duration::minutes(i64::from(g)));
    }

    #[test]
    fn floor_mode_is_always_later(t in instant(), g in 1u32..=60) {
        let rounded = round_to_boundary(t, g, false);
        prop_assert!(rounded > t);
        prop_assert!(rounded - t <= Duration::minutes(i64::from(g)));
    }

    #[test]
    fn intervals_are_evenly_spaced(t in instant(), span in 0i64..600, g in 1u32..=30) {
        let end = t + Duration::minutes(span);
        let intervals = fill_intervals(t, Some(end), g, &clock());
        let step = Duration::minutes(i64::from(g));
        prop_assert!(intervals.windows(2).all(|w| w[1] - w[0] == step));
        if let Some(last) = intervals.last() {
            prop_assert!(*last <= end);
        }
    }
}
