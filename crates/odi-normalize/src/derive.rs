//! Typed field derivation from raw cell strings.
//!
//! Dates are parsed independently of locale: only year-first forms are
//! accepted, so `01/02/2020` (day-first or month-first depending on who
//! typed it) is rejected instead of guessed.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use odi_model::Sex;

use crate::error::DeriveError;

/// Year-first calendar date layouts.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// ISO 8601 date-time layouts without an offset.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a raw sex cell: exactly `M`/`m`/`F`/`f`.
pub fn parse_sex(raw: &str) -> Result<Sex, DeriveError> {
    raw.parse::<Sex>().map_err(|_| DeriveError::InvalidSex {
        value: raw.to_string(),
    })
}

/// Parse a raw date cell into a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD` and ISO 8601 date-times
/// (`YYYY-MM-DDThh:mm[:ss[.fff]][Z|±hh:mm]`). For date-times the calendar
/// date is kept as written; no timezone conversion is applied.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DeriveError> {
    let trimmed = raw.trim();
    let invalid = || DeriveError::InvalidDate {
        value: raw.to_string(),
    };
    if !has_leading_year(trimmed) {
        return Err(invalid());
    }
    let parsed = if trimmed.contains('T') {
        parse_date_time(trimmed)
    } else {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
    };
    parsed.ok_or_else(invalid)
}

/// Four digit year followed by a date separator.
fn has_leading_year(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() > 4
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && matches!(bytes[4], b'-' | b'/')
}

fn parse_date_time(value: &str) -> Option<NaiveDate> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.date_naive());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|date_time| date_time.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_sex_case_insensitive() {
        assert_eq!(parse_sex("M").unwrap(), Sex::Male);
        assert_eq!(parse_sex("m").unwrap(), Sex::Male);
        assert_eq!(parse_sex("F").unwrap(), Sex::Female);
        assert_eq!(parse_sex("f").unwrap(), Sex::Female);
    }

    #[test]
    fn test_parse_sex_unknown_code() {
        assert_eq!(
            parse_sex("X"),
            Err(DeriveError::InvalidSex {
                value: "X".to_string()
            })
        );
        assert!(parse_sex("").is_err());
        assert!(parse_sex("Male").is_err());
        assert!(parse_sex(" f ").is_err());
    }

    #[test]
    fn test_parse_iso_dates() {
        assert_eq!(parse_date("1990-01-01").unwrap(), date(1990, 1, 1));
        assert_eq!(parse_date(" 2020-05-01 ").unwrap(), date(2020, 5, 1));
        assert_eq!(parse_date("2020/05/01").unwrap(), date(2020, 5, 1));
    }

    #[test]
    fn test_parse_date_times_keep_written_date() {
        assert_eq!(parse_date("2021-06-01T10:30").unwrap(), date(2021, 6, 1));
        assert_eq!(parse_date("2021-06-01T10:30:15").unwrap(), date(2021, 6, 1));
        assert_eq!(
            parse_date("2021-06-01T23:30:00-05:00").unwrap(),
            date(2021, 6, 1)
        );
        assert_eq!(
            parse_date("2021-06-01T00:15:00.250Z").unwrap(),
            date(2021, 6, 1)
        );
    }

    #[test]
    fn test_parse_date_rejects_ambiguous_and_invalid() {
        for raw in [
            "",
            "01/02/2020",
            "1/2/20",
            "20200501",
            "2020-02-30",
            "2020-13-01",
            "not a date",
            "2020-05-01 extra",
        ] {
            assert_eq!(
                parse_date(raw),
                Err(DeriveError::InvalidDate {
                    value: raw.to_string()
                }),
                "{raw:?} should be rejected"
            );
        }
    }
}
