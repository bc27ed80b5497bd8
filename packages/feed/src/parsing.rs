//! Shared parsing utilities for feed properties.

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use quake_feed_quake_models::LOCAL_OFFSET_HOURS;

/// Converts epoch milliseconds to a UTC wall-clock time, truncated to the
/// second. Returns `None` if the value is missing, zero, or out of range.
#[must_use]
pub fn epoch_ms_to_utc(ms: Option<i64>) -> Option<NaiveDateTime> {
    let secs = ms.filter(|&ms| ms != 0)?.div_euclid(1000);
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

/// Converts epoch milliseconds to the fixed UTC+8 local wall-clock time,
/// truncated to the second.
#[must_use]
pub fn epoch_ms_to_local(ms: Option<i64>) -> Option<NaiveDateTime> {
    epoch_ms_to_utc(ms)?.checked_add_signed(TimeDelta::hours(LOCAL_OFFSET_HOURS))
}

/// Treats empty (or whitespace-only) strings as absent.
#[must_use]
pub fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use quake_feed_quake_models::format_timestamp;

    use super::*;

    #[test]
    fn converts_epoch_ms_to_utc() {
        let ts = epoch_ms_to_utc(Some(1_700_000_000_000)).unwrap();
        assert_eq!(format_timestamp(&ts), "2023-11-14 22:13:20");
    }

    #[test]
    fn truncates_sub_second_precision() {
        let ts = epoch_ms_to_utc(Some(1_700_000_000_999)).unwrap();
        assert_eq!(format_timestamp(&ts), "2023-11-14 22:13:20");
    }

    #[test]
    fn local_is_utc_plus_eight_hours() {
        let utc = epoch_ms_to_utc(Some(1_700_000_000_000)).unwrap();
        let local = epoch_ms_to_local(Some(1_700_000_000_000)).unwrap();
        assert_eq!(local - utc, TimeDelta::hours(8));
        assert_eq!(format_timestamp(&local), "2023-11-15 06:13:20");
    }

    #[test]
    fn missing_epoch_is_none() {
        assert!(epoch_ms_to_utc(None).is_none());
        assert!(epoch_ms_to_local(None).is_none());
    }

    #[test]
    fn zero_epoch_is_none() {
        assert!(epoch_ms_to_utc(Some(0)).is_none());
        assert!(epoch_ms_to_local(Some(0)).is_none());
    }

    #[test]
    fn pre_epoch_values_convert() {
        let ts = epoch_ms_to_utc(Some(-1)).unwrap();
        assert_eq!(format_timestamp(&ts), "1969-12-31 23:59:59");
    }

    #[test]
    fn empty_strings_are_absent() {
        assert_eq!(non_empty(Some(&String::new())), None);
        assert_eq!(non_empty(Some(&"  ".to_string())), None);
        assert_eq!(non_empty(Some(&"ok".to_string())), Some("ok".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
