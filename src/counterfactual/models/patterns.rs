//! Cyclical patterns — per-calendar-period mean deviations.
//!
//! Purpose
//! -------
//! Capture recurring calendar structure (hour-of-day, weekday, …) in the
//! pre-event window as an additive deviation from the window mean, and look
//! those deviations up again for forecast timestamps.
//!
//! Key behaviors
//! -------------
//! - [`CyclicalPatternExtractor::extract`] groups the non-missing values of a
//!   column by period index, averages each group, and subtracts the overall
//!   mean of the window.
//! - The resulting [`CyclicalPattern`] is dense over the full domain of its
//!   [`CyclePeriod`]; indices without observations carry `0.0`.
//! - [`CyclicalPatternExtractor::apply`] maps timestamps to adjustments.
//!
//! Invariants & assumptions
//! ------------------------
//! - `deviations.len() == period.domain_len()`.
//! - Deviations of observed indices, weighted by their counts, sum to zero.
use chrono::NaiveDateTime;
use ndarray::Array1;

use crate::counterfactual::{
    core::{calendar::CyclePeriod, frame::TimeFrame},
    errors::{CFResult, CounterfactualError},
};

/// CyclicalPattern — dense deviation table over a period's domain.
#[derive(Debug, Clone, PartialEq)]
pub struct CyclicalPattern {
    period: CyclePeriod,
    overall_mean: f64,
    deviations: Array1<f64>,
    counts: Vec<usize>,
}

impl CyclicalPattern {
    pub fn period(&self) -> CyclePeriod {
        self.period
    }

    /// Mean of the window the pattern was extracted from.
    pub fn overall_mean(&self) -> f64 {
        self.overall_mean
    }

    /// Number of entries (always the full domain size).
    pub fn len(&self) -> usize {
        self.deviations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deviations.is_empty()
    }

    /// Deviation at a period index; `None` outside the domain.
    pub fn get(&self, index: usize) -> Option<f64> {
        let offset = index.checked_sub(*self.period.domain().start())?;
        self.deviations.get(offset).copied()
    }

    /// Observation count behind a period index; `None` outside the domain.
    pub fn count(&self, index: usize) -> Option<usize> {
        let offset = index.checked_sub(*self.period.domain().start())?;
        self.counts.get(offset).copied()
    }

    /// `(period index, deviation)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.period.domain().zip(self.deviations.iter().copied())
    }

    /// Adjustment for one timestamp.
    pub fn adjustment(&self, ts: NaiveDateTime) -> f64 {
        self.get(self.period.index(ts)).unwrap_or(0.0)
    }
}

/// CyclicalPatternExtractor — extracts and applies [`CyclicalPattern`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclicalPatternExtractor {
    period: CyclePeriod,
}

impl CyclicalPatternExtractor {
    pub fn new(period: CyclePeriod) -> Self {
        CyclicalPatternExtractor { period }
    }

    pub fn period(&self) -> CyclePeriod {
        self.period
    }

    /// Period index of a timestamp under this extractor's granularity.
    pub fn period_index(&self, ts: NaiveDateTime) -> usize {
        self.period.index(ts)
    }

    /// Extract the pattern of `target_column` over the whole frame.
    ///
    /// # Errors
    /// - `CounterfactualError::MissingColumn` if the column is absent.
    /// - `CounterfactualError::AllMissingTarget` if every value is `NaN`.
    pub fn extract(&self, frame: &TimeFrame, target_column: &str) -> CFResult<CyclicalPattern> {
        let (timestamps, values) = frame.observed(target_column)?;
        if values.is_empty() {
            return Err(CounterfactualError::AllMissingTarget { column: target_column.to_string() });
        }

        let start = *self.period.domain().start();
        let size = self.period.domain_len();
        let mut sums = vec![0.0; size];
        let mut counts = vec![0usize; size];
        for (ts, value) in timestamps.iter().zip(&values) {
            let offset = self.period.index(*ts) - start;
            sums[offset] += value;
            counts[offset] += 1;
        }

        let overall_mean = values.iter().sum::<f64>() / values.len() as f64;
        let deviations = sums
            .iter()
            .zip(&counts)
            .map(|(sum, &count)| if count == 0 { 0.0 } else { sum / count as f64 - overall_mean })
            .collect();

        Ok(CyclicalPattern { period: self.period, overall_mean, deviations, counts })
    }

    /// Adjustment for every timestamp; `0.0` where the pattern has no entry.
    pub fn apply(&self, pattern: &CyclicalPattern, timestamps: &[NaiveDateTime]) -> Array1<f64> {
        timestamps.iter().map(|ts| pattern.adjustment(*ts)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, TimeDelta};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Pattern completeness over each domain.
    // - Group means minus the overall mean, with NaN values ignored.
    // - Error cases (missing column, all-missing target).
    // - Applying a pattern to forecast timestamps.
    // -------------------------------------------------------------------------

    fn hourly_frame(values: Vec<f64>) -> TimeFrame {
        let base = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let ts: Vec<NaiveDateTime> =
            (0..values.len()).map(|h| base + TimeDelta::hours(h as i64)).collect();
        TimeFrame::new(ts).unwrap().with_column("pm25", values).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Every index of the domain is present, even with a short window.
    //
    // Given
    // -----
    // - Six hourly observations (hours 0..=5).
    //
    // Expect
    // ------
    // - 24 entries for `Hour`, 7 for `DayOfWeek`, 366 for `DayOfYear`;
    //   hours 6..=23 are 0.0.
    fn pattern_is_dense_over_domain() {
        let frame = hourly_frame(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let hour = CyclicalPatternExtractor::new(CyclePeriod::Hour).extract(&frame, "pm25").unwrap();
        assert_eq!(hour.len(), 24);
        assert!((6..24).all(|h| hour.get(h) == Some(0.0) && hour.count(h) == Some(0)));
        assert_eq!(hour.get(24), None);

        let dow = CyclicalPatternExtractor::new(CyclePeriod::DayOfWeek).extract(&frame, "pm25").unwrap();
        assert_eq!(dow.len(), 7);
        let doy = CyclicalPatternExtractor::new(CyclePeriod::DayOfYear).extract(&frame, "pm25").unwrap();
        assert_eq!(doy.len(), 366);
        assert_eq!(doy.get(0), None);
        assert_eq!(doy.iter().next().map(|(i, _)| i), Some(1));
    }

    #[test]
    // Purpose
    // -------
    // Deviations are group means minus the overall mean; NaN is skipped.
    //
    // Given
    // -----
    // - Two days of hourly data where hour h has value h on day one and
    //   h + 2 on day two, with one NaN at day-two hour 3.
    //
    // Expect
    // ------
    // - overall mean = mean of the 47 observed values.
    // - deviation(h) = (h + 1) − mean for h ≠ 3, and 3 − mean for h = 3.
    fn deviations_are_group_means_minus_overall_mean() {
        let mut values: Vec<f64> = (0..24).map(f64::from).collect();
        values.extend((0..24).map(|h| f64::from(h) + 2.0));
        values[24 + 3] = f64::NAN;
        let observed: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let mean = observed.iter().sum::<f64>() / observed.len() as f64;
        let frame = hourly_frame(values);

        let pattern =
            CyclicalPatternExtractor::new(CyclePeriod::Hour).extract(&frame, "pm25").unwrap();

        assert_relative_eq!(pattern.overall_mean(), mean, epsilon = 1e-12);
        for h in 0..24usize {
            let group_mean = if h == 3 { 3.0 } else { h as f64 + 1.0 };
            assert_relative_eq!(pattern.get(h).unwrap(), group_mean - mean, epsilon = 1e-12);
        }
        assert_eq!(pattern.count(3), Some(1));
        assert_eq!(pattern.count(4), Some(2));
    }

    #[test]
    fn extract_errors() {
        let extractor = CyclicalPatternExtractor::new(CyclePeriod::Hour);
        let frame = hourly_frame(vec![f64::NAN; 4]);
        assert_eq!(
            extractor.extract(&frame, "pm25"),
            Err(CounterfactualError::AllMissingTarget { column: "pm25".into() })
        );
        assert!(matches!(
            extractor.extract(&frame, "no2"),
            Err(CounterfactualError::MissingColumn { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `apply` looks up each timestamp's period index.
    fn apply_maps_timestamps_to_deviations() {
        let frame = hourly_frame(vec![10.0, 20.0, 30.0]);
        let extractor = CyclicalPatternExtractor::new(CyclePeriod::Hour);
        let pattern = extractor.extract(&frame, "pm25").unwrap();

        let next_day = NaiveDate::from_ymd_opt(2024, 7, 2).unwrap();
        let ts = [
            next_day.and_hms_opt(0, 0, 0).unwrap(),
            next_day.and_hms_opt(2, 0, 0).unwrap(),
            next_day.and_hms_opt(12, 0, 0).unwrap(),
        ];

        let adj = extractor.apply(&pattern, &ts);

        assert_eq!(adj.to_vec(), vec![-10.0, 10.0, 0.0]);
        assert_eq!(extractor.period_index(ts[2]), 12);
    }
}
