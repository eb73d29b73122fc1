//! Tests for date ranges and the business timezone

use chrono::{NaiveDate, TimeZone, Utc};
use core_kernel::temporal::{parse_date, DateRange, TemporalError, Timezone};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod date_range {
    use super::*;

    #[test]
    fn test_single_day_contains_only_that_day() {
        let range = DateRange::single_day(date(2024, 3, 15));

        assert!(range.contains(date(2024, 3, 15)));
        assert!(!range.contains(date(2024, 3, 14)));
        assert!(!range.contains(date(2024, 3, 16)));
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn test_precedes_is_strict() {
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 20)).unwrap();

        assert!(range.precedes(date(2024, 1, 9)));
        assert!(!range.precedes(date(2024, 1, 10)));
        assert!(!range.precedes(date(2024, 1, 15)));
    }

    #[test]
    fn test_from_bounds_opens_missing_ends() {
        let range = DateRange::from_bounds(None, Some(date(2024, 6, 30))).unwrap();

        assert!(range.contains(date(1990, 1, 1)));
        assert!(range.contains(date(2024, 6, 30)));
        assert!(!range.contains(date(2024, 7, 1)));
    }

    #[test]
    fn test_from_bounds_rejects_inverted_window() {
        let result = DateRange::from_bounds(Some(date(2024, 7, 1)), Some(date(2024, 6, 30)));

        assert!(matches!(result, Err(TemporalError::InvalidRange { .. })));
    }

    #[test]
    fn test_through_covers_all_prior_history() {
        let range = DateRange::through(date(2024, 1, 1));

        assert_eq!(range.start(), NaiveDate::MIN);
        assert_eq!(range.end(), date(2024, 1, 1));
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date(" 2024-01-03 ").unwrap(), date(2024, 1, 3));
    }

    #[test]
    fn test_parse_rejects_day_first_format() {
        assert!(matches!(
            parse_date("03/01/2024"),
            Err(TemporalError::InvalidDate(_))
        ));
    }
}

mod timezone {
    use super::*;

    #[test]
    fn test_lagos_date_rolls_over_before_utc() {
        let tz: Timezone = "Africa/Lagos".parse().unwrap();
        let late_utc = Utc.with_ymd_and_hms(2024, 5, 31, 23, 30, 0).unwrap();

        assert_eq!(tz.date_of(late_utc), date(2024, 6, 1));
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let result: Result<Timezone, _> = "Mars/Olympus".parse();

        assert!(matches!(result, Err(TemporalError::InvalidTimezone(_))));
    }

    #[test]
    fn test_timezone_serde_uses_iana_name() {
        let tz = Timezone::default();
        let json = serde_json::to_string(&tz).unwrap();

        assert_eq!(json, "\"Africa/Lagos\"");
        let back: Timezone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tz);
    }
}
