//! # Temporal Constants
//!
//! Flight windows are unix timestamps in seconds (UTC). These are the fixed
//! bounds every flight must respect, plus a helper that renders a timestamp
//! as RFC 3339 for rejection messages.

use chrono::{DateTime, SecondsFormat, Utc};

/// 2000-01-01T00:00:00Z. No flight window may start earlier.
pub const YEAR_2000_EPOCH: i64 = 946_684_800;

/// 3000-01-01T00:00:00Z. No flight window may end later.
pub const YEAR_3000_EPOCH: i64 = 32_503_680_000;

/// Minimum launch window length: 14 days.
pub const LAUNCH_WINDOW_MIN_SECS: i64 = 14 * 24 * 3600;

/// Render a unix timestamp as `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Sub-second parts are truncated. Values chrono cannot represent fall back
/// to the raw number.
pub fn describe_epoch(secs: f64) -> String {
    if !secs.is_finite() {
        return secs.to_string();
    }
    let whole = secs.floor();
    #[allow(clippy::cast_possible_truncation)]
    let as_int = whole as i64;
    if (as_int as f64 - whole).abs() > 0.0 {
        return secs.to_string();
    }
    match DateTime::<Utc>::from_timestamp(as_int, 0) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => secs.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bounds_match_calendar() {
        let y2k = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(y2k.timestamp(), YEAR_2000_EPOCH);
        let y3k = Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(y3k.timestamp(), YEAR_3000_EPOCH);
    }

    #[test]
    fn test_describe_epoch() {
        assert_eq!(describe_epoch(946_684_800.0), "2000-01-01T00:00:00Z");
        assert_eq!(describe_epoch(946_684_800.75), "2000-01-01T00:00:00Z");
    }

    #[test]
    fn test_describe_non_finite() {
        assert_eq!(describe_epoch(f64::NAN), "NaN");
    }

    #[test]
    fn test_window_is_fourteen_days() {
        assert_eq!(LAUNCH_WINDOW_MIN_SECS, 1_209_600);
    }
}
