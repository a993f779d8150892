//! Sampling frequency — inference, cycle auto-detection, and forecast grids.
//!
//! Purpose
//! -------
//! Turn the pre-event time axis into (a) the sampling step used to lay out
//! the forecast timeline and (b) a default calendar granularity for the
//! seasonal pattern when the caller has not chosen one.
//!
//! Key behaviors
//! -------------
//! - [`Frequency::infer`] recognizes an exact regular step (three or more
//!   timestamps with identical gaps) and calendar-monthly sampling; anything
//!   else falls back to the median gap rounded to hourly, daily, weekly, or
//!   monthly.
//! - [`detect_cycle_period`] maps the median gap to a [`CyclePeriod`].
//! - [`Frequency::grid`] lays out `start + k·step` for every `k` that stays
//!   inside `[start, end]`. Start and point count are fixed; no end-alignment
//!   or re-anchoring happens.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input timestamps are strictly increasing (guaranteed by `TimeFrame`),
//!   so every gap is positive.
//! - Monthly steps are computed from `start` (`start + k months`), so a
//!   start on the 31st clamps per month without drifting.
use chrono::{Datelike, Months, NaiveDateTime, TimeDelta};
use statrs::statistics::{Data, Median};

use crate::counterfactual::core::calendar::CyclePeriod;

/// Frequency — the step between consecutive forecast timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// Fixed wall-clock step (always positive).
    Fixed(TimeDelta),
    /// One calendar month.
    Monthly,
}

impl Frequency {
    pub fn hourly() -> Self {
        Frequency::Fixed(TimeDelta::hours(1))
    }

    pub fn daily() -> Self {
        Frequency::Fixed(TimeDelta::days(1))
    }

    pub fn weekly() -> Self {
        Frequency::Fixed(TimeDelta::weeks(1))
    }

    /// Infer the sampling frequency of a strictly increasing time axis.
    ///
    /// Rules, first match wins:
    /// 1. At least three timestamps with identical gaps → `Fixed(gap)`.
    /// 2. At least three timestamps one calendar month apart at a constant
    ///    day-of-month and time of day → `Monthly`.
    /// 3. Median gap ≤ 1h → hourly, ≤ 1d → daily, ≤ 1w → weekly, else monthly.
    /// 4. No gaps at all → hourly.
    pub fn infer(timestamps: &[NaiveDateTime]) -> Frequency {
        if timestamps.len() >= 3 {
            let first_gap = timestamps[1] - timestamps[0];
            if timestamps.windows(2).all(|w| w[1] - w[0] == first_gap) {
                return Frequency::Fixed(first_gap);
            }
            if is_calendar_monthly(timestamps) {
                return Frequency::Monthly;
            }
        }

        match median_gap(timestamps) {
            None => Frequency::hourly(),
            Some(gap) if gap <= TimeDelta::hours(1) => Frequency::hourly(),
            Some(gap) if gap <= TimeDelta::days(1) => Frequency::daily(),
            Some(gap) if gap <= TimeDelta::weeks(1) => Frequency::weekly(),
            Some(_) => Frequency::Monthly,
        }
    }

    /// The `k`-th grid point after `start`, or `None` on calendar overflow.
    pub fn nth_after(&self, start: NaiveDateTime, k: usize) -> Option<NaiveDateTime> {
        match self {
            Frequency::Fixed(step) => {
                let k = i32::try_from(k).ok()?;
                start.checked_add_signed(step.checked_mul(k)?)
            }
            Frequency::Monthly => start.checked_add_months(Months::new(u32::try_from(k).ok()?)),
        }
    }

    /// Grid `start + k·step` for every `k` with `start + k·step <= end`.
    ///
    /// Empty when `end < start`.
    pub fn grid(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
        if matches!(self, Frequency::Fixed(step) if *step <= TimeDelta::zero()) {
            return if start <= end { vec![start] } else { Vec::new() };
        }
        let mut grid = Vec::new();
        let mut k = 0;
        while let Some(ts) = self.nth_after(start, k) {
            if ts > end {
                break;
            }
            grid.push(ts);
            k += 1;
        }
        grid
    }
}

/// Median gap between consecutive timestamps; `None` with fewer than two.
///
/// Gaps are measured in nanoseconds, so sub-millisecond sampling keeps a
/// non-zero median.
pub fn median_gap(timestamps: &[NaiveDateTime]) -> Option<TimeDelta> {
    if timestamps.len() < 2 {
        return None;
    }
    let gaps: Vec<f64> = timestamps
        .windows(2)
        .map(|w| {
            let gap = w[1] - w[0];
            gap.num_seconds() as f64 * NANOS_PER_SEC + f64::from(gap.subsec_nanos())
        })
        .collect();
    let median = Data::new(gaps).median();
    let secs = (median / NANOS_PER_SEC).floor();
    let nanos = (median - secs * NANOS_PER_SEC).round();
    Some(TimeDelta::seconds(secs as i64) + TimeDelta::nanoseconds(nanos as i64))
}

const NANOS_PER_SEC: f64 = 1e9;

/// Choose a cycle granularity from the median sampling gap.
///
/// ≤ 6h → `Hour`, ≤ 3d → `DayOfWeek`, ≤ 2w → `Week`, else `Month`;
/// `Hour` when there are no gaps.
pub fn detect_cycle_period(timestamps: &[NaiveDateTime]) -> CyclePeriod {
    match median_gap(timestamps) {
        None => CyclePeriod::Hour,
        Some(gap) if gap <= TimeDelta::hours(6) => CyclePeriod::Hour,
        Some(gap) if gap <= TimeDelta::days(3) => CyclePeriod::DayOfWeek,
        Some(gap) if gap <= TimeDelta::weeks(2) => CyclePeriod::Week,
        Some(_) => CyclePeriod::Month,
    }
}

fn is_calendar_monthly(timestamps: &[NaiveDateTime]) -> bool {
    let (day, time) = (timestamps[0].day(), timestamps[0].time());
    timestamps.iter().all(|ts| ts.day() == day && ts.time() == time)
        && timestamps
            .windows(2)
            .all(|w| w[0].checked_add_months(Months::new(1)) == Some(w[1]))
}
