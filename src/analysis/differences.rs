//! Actual vs counterfactual differences and their per-time aggregation.
//!
//! Purpose
//! -------
//! Align observations with a counterfactual forecast and measure the event's
//! effect as `difference = actual − counterfactual`, either for one series
//! ([`calculate_differences`], [`compare`]) or across many entities at each
//! timestamp ([`aggregate_by_time`]).
//!
//! Key behaviors
//! -------------
//! - Alignment is an inner join on exact timestamps: a row exists only where
//!   both the observation and the forecast cell are present.
//! - Aggregation groups rows from all input series by timestamp and
//!   summarizes each group with [`SummaryStatistics`].
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use ndarray::Array1;

use crate::{
    analysis::{
        errors::{AnalysisError, AnalysisResult},
        statistics::SummaryStatistics,
    },
    counterfactual::{core::frame::TimeFrame, models::output::ForecastFrame},
};

/// One aligned timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferenceRow {
    pub timestamp: NaiveDateTime,
    pub actual: f64,
    pub counterfactual: f64,
    pub difference: f64,
}

/// DifferenceSeries — aligned rows for one series, in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceSeries {
    entity: Option<String>,
    rows: Vec<DifferenceRow>,
}

impl DifferenceSeries {
    /// Tag the series with the entity it belongs to.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn rows(&self) -> &[DifferenceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.rows.iter().map(|r| r.timestamp).collect()
    }

    pub fn differences(&self) -> Array1<f64> {
        self.rows.iter().map(|r| r.difference).collect()
    }

    /// Summary of the differences; `None` for an empty series.
    pub fn summary(&self) -> Option<SummaryStatistics> {
        let values: Vec<f64> = self.rows.iter().map(|r| r.difference).collect();
        SummaryStatistics::compute(&values)
    }
}

/// Statistics of all differences observed at one timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAggregate {
    pub timestamp: NaiveDateTime,
    pub stats: SummaryStatistics,
}

/// Differences, their overall summary, and the per-time aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub differences: DifferenceSeries,
    pub summary: Option<SummaryStatistics>,
    pub by_time: Vec<TimeAggregate>,
}

/// Align `actual[actual_column]` with `forecast[forecast_column]`.
///
/// # Errors
/// - `MissingActualColumn` / `MissingForecastColumn` when a column is absent.
pub fn calculate_differences(
    actual: &TimeFrame, actual_column: &str, forecast: &ForecastFrame, forecast_column: &str,
) -> AnalysisResult<DifferenceSeries> {
    if forecast.column(forecast_column).is_none() {
        return Err(AnalysisError::MissingForecastColumn { column: forecast_column.to_string() });
    }
    let (timestamps, values) = actual
        .observed(actual_column)
        .map_err(|_| AnalysisError::MissingActualColumn { column: actual_column.to_string() })?;

    let rows = timestamps
        .into_iter()
        .zip(values)
        .filter_map(|(timestamp, actual)| {
            forecast.get(timestamp, forecast_column).map(|counterfactual| DifferenceRow {
                timestamp,
                actual,
                counterfactual,
                difference: actual - counterfactual,
            })
        })
        .collect();

    Ok(DifferenceSeries { entity: None, rows })
}

/// Per-timestamp statistics across several difference series.
///
/// Output is sorted by timestamp; a timestamp appears when at least one
/// series has a row there.
pub fn aggregate_by_time(series: &[DifferenceSeries]) -> Vec<TimeAggregate> {
    let mut groups: BTreeMap<NaiveDateTime, Vec<f64>> = BTreeMap::new();
    for row in series.iter().flat_map(|s| s.rows.iter()) {
        groups.entry(row.timestamp).or_default().push(row.difference);
    }
    groups
        .into_iter()
        .filter_map(|(timestamp, values)| {
            SummaryStatistics::compute(&values).map(|stats| TimeAggregate { timestamp, stats })
        })
        .collect()
}

/// [`calculate_differences`] plus its summary and per-time aggregate.
pub fn compare(
    actual: &TimeFrame, actual_column: &str, forecast: &ForecastFrame, forecast_column: &str,
) -> AnalysisResult<Comparison> {
    let differences = calculate_differences(actual, actual_column, forecast, forecast_column)?;
    let summary = differences.summary();
    let by_time = aggregate_by_time(std::slice::from_ref(&differences));
    Ok(Comparison { differences, summary, by_time })
}
