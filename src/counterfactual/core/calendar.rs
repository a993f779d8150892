//! Calendar cycle granularities.
//!
//! [`CyclePeriod`] is the closed set of calendar periods a seasonal pattern
//! can be keyed on. Each variant owns one pure period function
//! ([`CyclePeriod::index`]) and one fixed index domain
//! ([`CyclePeriod::domain`]); patterns are dense over that domain.
use std::{fmt, ops::RangeInclusive, str::FromStr};

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::counterfactual::errors::CounterfactualError;

/// CyclePeriod — calendar granularity of a cyclical pattern.
///
/// | variant     | index                    | domain |
/// |-------------|--------------------------|--------|
/// | `Hour`      | hour of day              | 0–23   |
/// | `DayOfWeek` | weekday, Monday = 0      | 0–6    |
/// | `Week`      | ISO week number          | 1–53   |
/// | `Month`     | month of year            | 1–12   |
/// | `DayOfYear` | ordinal day              | 1–366  |
/// | `Quarter`   | calendar quarter         | 1–4    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePeriod {
    Hour,
    #[serde(rename = "day", alias = "day_of_week")]
    DayOfWeek,
    Week,
    Month,
    DayOfYear,
    Quarter,
}

impl CyclePeriod {
    pub const ALL: [CyclePeriod; 6] = [
        CyclePeriod::Hour,
        CyclePeriod::DayOfWeek,
        CyclePeriod::Week,
        CyclePeriod::Month,
        CyclePeriod::DayOfYear,
        CyclePeriod::Quarter,
    ];

    /// Period index of `ts`; always inside [`CyclePeriod::domain`].
    pub fn index(self, ts: NaiveDateTime) -> usize {
        match self {
            CyclePeriod::Hour => ts.hour() as usize,
            CyclePeriod::DayOfWeek => ts.weekday().num_days_from_monday() as usize,
            CyclePeriod::Week => ts.iso_week().week() as usize,
            CyclePeriod::Month => ts.month() as usize,
            CyclePeriod::DayOfYear => ts.ordinal() as usize,
            CyclePeriod::Quarter => (ts.month0() / 3 + 1) as usize,
        }
    }

    /// Every index the period function can return.
    pub fn domain(self) -> RangeInclusive<usize> {
        match self {
            CyclePeriod::Hour => 0..=23,
            CyclePeriod::DayOfWeek => 0..=6,
            CyclePeriod::Week => 1..=53,
            CyclePeriod::Month => 1..=12,
            CyclePeriod::DayOfYear => 1..=366,
            CyclePeriod::Quarter => 1..=4,
        }
    }

    /// Number of indices in the domain.
    pub fn domain_len(self) -> usize {
        let domain = self.domain();
        domain.end() - domain.start() + 1
    }

    /// Canonical lowercase name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            CyclePeriod::Hour => "hour",
            CyclePeriod::DayOfWeek => "day",
            CyclePeriod::Week => "week",
            CyclePeriod::Month => "month",
            CyclePeriod::DayOfYear => "day_of_year",
            CyclePeriod::Quarter => "quarter",
        }
    }
}

impl fmt::Display for CyclePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CyclePeriod {
    type Err = CounterfactualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(CyclePeriod::Hour),
            "day" | "day_of_week" => Ok(CyclePeriod::DayOfWeek),
            "week" => Ok(CyclePeriod::Week),
            "month" => Ok(CyclePeriod::Month),
            "day_of_year" => Ok(CyclePeriod::DayOfYear),
            "quarter" => Ok(CyclePeriod::Quarter),
            _ => Err(CounterfactualError::InvalidOption {
                name: "cycle_period",
                reason: "Expected one of hour, day, week, month, day_of_year, quarter.",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Each period function returns the documented calendar index.
    //
    // Given
    // -----
    // - 2024-07-17 13:00, a Wednesday in ISO week 29, day 199 of a leap year.
    fn index_matches_calendar() {
        let ts = at(2024, 7, 17, 13);
        assert_eq!(CyclePeriod::Hour.index(ts), 13);
        assert_eq!(CyclePeriod::DayOfWeek.index(ts), 2);
        assert_eq!(CyclePeriod::Week.index(ts), 29);
        assert_eq!(CyclePeriod::Month.index(ts), 7);
        assert_eq!(CyclePeriod::DayOfYear.index(ts), 199);
        assert_eq!(CyclePeriod::Quarter.index(ts), 3);
    }

    #[test]
    fn index_stays_inside_domain_at_year_edges() {
        for ts in [at(2020, 12, 31, 23), at(2021, 1, 1, 0), at(2026, 12, 28, 0)] {
            for period in CyclePeriod::ALL {
                assert!(period.domain().contains(&period.index(ts)), "{period} at {ts}");
            }
        }
        assert_eq!(CyclePeriod::DayOfYear.index(at(2020, 12, 31, 0)), 366);
        assert_eq!(CyclePeriod::Week.index(at(2020, 12, 31, 0)), 53);
    }

    #[test]
    fn domain_lengths() {
        let lens: Vec<usize> = CyclePeriod::ALL.iter().map(|p| p.domain_len()).collect();
        assert_eq!(lens, vec![24, 7, 53, 12, 366, 4]);
    }

    #[test]
    // Purpose
    // -------
    // String names round-trip through `FromStr`, serde, and `Display`.
    fn names_parse_and_serialize() {
        for period in CyclePeriod::ALL {
            assert_eq!(period.name().parse::<CyclePeriod>().unwrap(), period);
            let json = serde_json::to_string(&period).unwrap();
            assert_eq!(json, format!("\"{period}\""));
        }
        assert_eq!("Day_Of_Week".parse::<CyclePeriod>().unwrap(), CyclePeriod::DayOfWeek);
        assert!("fortnight".parse::<CyclePeriod>().is_err());
    }
}
