//! Timestamp normalization — every instant entering the engine is timezone-naive.
//!
//! Aware timestamps keep their local wall-clock reading and drop the offset,
//! so `2024-07-15T00:00:00+05:00` becomes `2024-07-15T00:00:00`. Dates are
//! promoted to midnight. Strings are accepted in RFC 3339 and the common
//! `YYYY-MM-DD[ HH:MM[:SS[.fff]]]` layouts.
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::counterfactual::errors::{CFResult, CounterfactualError};

const NAIVE_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

const AWARE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Conversion into the canonical timezone-naive instant.
pub trait IntoNaiveTimestamp {
    fn into_naive(self) -> NaiveDateTime;
}

impl IntoNaiveTimestamp for NaiveDateTime {
    fn into_naive(self) -> NaiveDateTime {
        self
    }
}

impl IntoNaiveTimestamp for NaiveDate {
    fn into_naive(self) -> NaiveDateTime {
        self.and_time(NaiveTime::MIN)
    }
}

impl<Tz: TimeZone> IntoNaiveTimestamp for DateTime<Tz> {
    fn into_naive(self) -> NaiveDateTime {
        self.naive_local()
    }
}

/// Parse a timestamp string and normalize it to a naive instant.
///
/// # Errors
/// Returns [`CounterfactualError::InvalidTimestamp`] if no supported layout matches.
pub fn parse_timestamp(input: &str) -> CFResult<NaiveDateTime> {
    let trimmed = input.trim();

    if let Ok(aware) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(aware.into_naive());
    }
    for fmt in AWARE_FORMATS {
        if let Ok(aware) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(aware.into_naive());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.into_naive());
    }

    Err(CounterfactualError::InvalidTimestamp { input: input.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Aware timestamps keep their wall-clock reading; the offset is dropped.
    //
    // Given
    // -----
    // - 2024-07-15 00:00 at UTC+05:00.
    //
    // Expect
    // ------
    // - Naive 2024-07-15 00:00 (not the UTC instant 2024-07-14 19:00).
    fn aware_timestamps_drop_offset_keep_wall_clock() {
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        let aware = offset.from_local_datetime(&naive(2024, 7, 15, 0, 0)).unwrap();

        assert_eq!(aware.into_naive(), naive(2024, 7, 15, 0, 0));
        assert_eq!(Utc.from_utc_datetime(&naive(2024, 1, 1, 3, 0)).into_naive(), naive(2024, 1, 1, 3, 0));
    }

    #[test]
    fn dates_promote_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 17).unwrap();
        assert_eq!(date.into_naive(), naive(2024, 7, 17, 0, 0));
    }

    #[test]
    // Purpose
    // -------
    // Accept the layouts analysts actually type, reject garbage.
    fn parse_timestamp_accepts_common_layouts() {
        let expected = naive(2024, 7, 15, 6, 30);
        for input in [
            "2024-07-15T06:30:00",
            "2024-07-15 06:30:00",
            "2024-07-15 06:30",
            "2024-07-15T06:30:00+05:00",
            "2024-07-15 06:30:00+05:00",
            " 2024-07-15T06:30:00.000 ",
        ] {
            assert_eq!(parse_timestamp(input).unwrap(), expected, "input {input:?}");
        }
        assert_eq!(parse_timestamp("2024-07-15").unwrap(), naive(2024, 7, 15, 0, 0));

        match parse_timestamp("15/07/2024") {
            Err(CounterfactualError::InvalidTimestamp { input }) => assert_eq!(input, "15/07/2024"),
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }
}
