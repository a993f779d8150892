//! TimeFrame — validated, time-indexed input table.
//!
//! Purpose
//! -------
//! Hold the caller's cleaned observations: one strictly increasing time axis
//! and any number of named `f64` columns of the same length. The generator
//! reads from it; nothing in the core mutates it.
//!
//! Key behaviors
//! -------------
//! - [`TimeFrame::new`] normalizes every timestamp to a naive instant and
//!   rejects unsorted or duplicate timestamps.
//! - [`TimeFrame::with_column`] / [`TimeFrame::insert_column`] reject columns
//!   whose length differs from the time axis.
//! - [`TimeFrame::before`] returns the rows strictly before a cutoff, which is
//!   how the pre-event window is sliced.
//!
//! Invariants & assumptions
//! ------------------------
//! - `timestamps` is strictly increasing.
//! - Every column has exactly `timestamps.len()` values.
//! - Missing observations are `NaN`. `observed` also drops ±∞, so infinite
//!   readings never reach a fit.
//!
//! Conventions
//! -----------
//! - The time axis is named `"datetime"` unless overridden with
//!   [`TimeFrame::with_index_name`]; that name becomes the time column of
//!   forecast outputs.
//! - Columns are stored in a `BTreeMap`, so iteration is name-ordered.
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use ndarray::{Array1, ArrayView1, s};

use crate::counterfactual::{
    core::{
        timestamps::IntoNaiveTimestamp,
        validation::{validate_column_length, validate_strictly_increasing},
    },
    errors::{CFResult, CounterfactualError},
};

/// Default name of the time axis.
pub const DEFAULT_INDEX_NAME: &str = "datetime";

/// TimeFrame — strictly increasing timestamps plus named numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeFrame {
    index_name: String,
    timestamps: Vec<NaiveDateTime>,
    columns: BTreeMap<String, Array1<f64>>,
}

impl TimeFrame {
    /// Build an empty-column frame over the given time axis.
    ///
    /// # Errors
    /// Returns [`CounterfactualError::UnsortedTimestamps`] if the normalized
    /// timestamps are not strictly increasing.
    pub fn new<T, I>(timestamps: I) -> CFResult<Self>
    where
        T: IntoNaiveTimestamp,
        I: IntoIterator<Item = T>,
    {
        let timestamps: Vec<NaiveDateTime> =
            timestamps.into_iter().map(IntoNaiveTimestamp::into_naive).collect();
        validate_strictly_increasing(&timestamps)?;
        Ok(TimeFrame {
            index_name: DEFAULT_INDEX_NAME.to_string(),
            timestamps,
            columns: BTreeMap::new(),
        })
    }

    /// Rename the time axis.
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    /// Add (or replace) a column, consuming and returning the frame.
    ///
    /// # Errors
    /// Returns [`CounterfactualError::LengthMismatch`] if the column length
    /// differs from the time axis.
    pub fn with_column(mut self, name: impl Into<String>, values: impl Into<Array1<f64>>) -> CFResult<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// Add (or replace) a column in place.
    pub fn insert_column(&mut self, name: impl Into<String>, values: impl Into<Array1<f64>>) -> CFResult<()> {
        let name = name.into();
        let values = values.into();
        validate_column_length(&name, self.timestamps.len(), values.len())?;
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Borrow a column by name.
    ///
    /// # Errors
    /// Returns [`CounterfactualError::MissingColumn`] if absent.
    pub fn column(&self, name: &str) -> CFResult<ArrayView1<'_, f64>> {
        self.columns
            .get(name)
            .map(|values| values.view())
            .ok_or_else(|| CounterfactualError::MissingColumn { column: name.to_string() })
    }

    /// The frame's only column, if it has exactly one.
    pub fn sole_column_name(&self) -> Option<&str> {
        match self.columns.len() {
            1 => self.columns.keys().next().map(String::as_str),
            _ => None,
        }
    }

    /// Number of rows strictly before `cutoff`.
    pub fn rows_before(&self, cutoff: NaiveDateTime) -> usize {
        self.timestamps.partition_point(|ts| *ts < cutoff)
    }

    /// Rows strictly before `cutoff`, as a new frame with the same columns.
    pub fn before(&self, cutoff: impl IntoNaiveTimestamp) -> TimeFrame {
        let n = self.rows_before(cutoff.into_naive());
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), values.slice(s![..n]).to_owned()))
            .collect();
        TimeFrame {
            index_name: self.index_name.clone(),
            timestamps: self.timestamps[..n].to_vec(),
            columns,
        }
    }

    /// Timestamps and values of `column` where the value is finite; NaN and
    /// ±∞ both count as missing.
    pub fn observed(&self, column: &str) -> CFResult<(Vec<NaiveDateTime>, Vec<f64>)> {
        let values = self.column(column)?;
        Ok(self
            .timestamps
            .iter()
            .zip(values.iter())
            .filter(|(_, v)| v.is_finite())
            .map(|(ts, v)| (*ts, *v))
            .unzip())
    }
}
