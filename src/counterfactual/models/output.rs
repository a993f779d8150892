//! Forecast outputs — a single event's series and the merged wide table.
//!
//! Purpose
//! -------
//! Carry counterfactual paths out of the generator: [`ForecastSeries`] for
//! one event on its own grid, and [`ForecastFrame`] for several events
//! outer-joined on the union of their timestamps.
//!
//! Key behaviors
//! -------------
//! - [`ForecastFrame::merge`] computes the sorted, deduplicated union of all
//!   timestamps once, allocates one `NaN`-filled column per series, and fills
//!   each column independently by binary search on the union.
//! - Columns keep the order of the input series. A series whose value column
//!   name repeats an earlier one replaces that column in place.
//! - Cells outside a series' own timeline are missing: stored as `NaN`,
//!   exposed as `None` by the accessors.
use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use ndarray::{Array1, ArrayView1};

use crate::counterfactual::core::frame::DEFAULT_INDEX_NAME;

/// ForecastSeries — one event's counterfactual on an evenly spaced grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    time_column: String,
    value_column: String,
    timestamps: Vec<NaiveDateTime>,
    values: Array1<f64>,
}

impl ForecastSeries {
    /// Pair a grid with its values. Callers guarantee equal lengths.
    pub(crate) fn new(
        time_column: String, value_column: String, timestamps: Vec<NaiveDateTime>,
        values: Array1<f64>,
    ) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        ForecastSeries { time_column, value_column, timestamps, values }
    }

    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// Both column names, time first.
    pub fn columns(&self) -> [&str; 2] {
        [&self.time_column, &self.value_column]
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// `(timestamp, value)` rows in time order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at an exact timestamp.
    pub fn get(&self, ts: NaiveDateTime) -> Option<f64> {
        self.timestamps.binary_search(&ts).ok().map(|i| self.values[i])
    }
}

/// ForecastFrame — several forecast series outer-joined on time.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastFrame {
    time_column: String,
    timestamps: Vec<NaiveDateTime>,
    columns: Vec<(String, Array1<f64>)>,
}

impl ForecastFrame {
    /// Outer-join series on the union of their timestamps.
    ///
    /// The time column name is taken from the first series (`"datetime"`
    /// when there are none).
    pub fn merge(series: &[ForecastSeries]) -> ForecastFrame {
        let time_column =
            series.first().map_or(DEFAULT_INDEX_NAME, |s| s.time_column()).to_string();
        let timestamps: Vec<NaiveDateTime> = series
            .iter()
            .flat_map(|s| s.timestamps.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut columns: Vec<(String, Array1<f64>)> = Vec::with_capacity(series.len());
        for s in series {
            let mut column = Array1::from_elem(timestamps.len(), f64::NAN);
            for (ts, value) in s.iter() {
                if let Ok(row) = timestamps.binary_search(&ts) {
                    column[row] = value;
                }
            }
            match columns.iter_mut().find(|(name, _)| name == &s.value_column) {
                Some(existing) => existing.1 = column,
                None => columns.push((s.value_column.clone(), column)),
            }
        }

        ForecastFrame { time_column, timestamps, columns }
    }

    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn n_rows(&self) -> usize {
        self.timestamps.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Value column names in merge order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Raw column storage (`NaN` = missing).
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, values)| values.view())
    }

    /// Column cells with missing values as `None`.
    pub fn column_values(&self, name: &str) -> Option<Vec<Option<f64>>> {
        self.column(name).map(|values| values.iter().map(|v| present(*v)).collect())
    }

    /// Cell at `(row, column)`; `None` when missing or out of range.
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        self.column(name).and_then(|values| values.get(row).copied()).and_then(present)
    }

    /// Cell at an exact timestamp.
    pub fn get(&self, ts: NaiveDateTime, name: &str) -> Option<f64> {
        let row = self.timestamps.binary_search(&ts).ok()?;
        self.value(row, name)
    }

    /// Rows that have at least one present value.
    pub fn row_is_populated(&self, row: usize) -> bool {
        self.columns.iter().any(|(_, values)| values.get(row).is_some_and(|v| !v.is_nan()))
    }
}

impl From<ForecastSeries> for ForecastFrame {
    fn from(series: ForecastSeries) -> Self {
        ForecastFrame {
            time_column: series.time_column,
            timestamps: series.timestamps,
            columns: vec![(series.value_column, series.values)],
        }
    }
}

fn present(v: f64) -> Option<f64> {
    if v.is_nan() { None } else { Some(v) }
}
