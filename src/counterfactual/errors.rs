//! Errors for counterfactual generation (event windows, history checks,
//! recursion seeding, batch outcomes, and option validation).
//!
//! This module defines [`CounterfactualError`] and the [`CFResult`] alias used
//! across the counterfactual stack. The error implements `Display`/`Error` and
//! converts to `PyErr` when the `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - Timestamps carried in error payloads are already timezone-naive.
//! - The per-event data errors (`InvalidEventWindow`, `InsufficientHistory`,
//!   `AllMissingTarget`, `EmptyForecastWindow`) are *skippable*: batch
//!   generation downgrades them to a warning and moves on to the next event.
//!   Everything else aborts the batch.
//! - Numerical degeneracy in the AR fit (constant history, singular design,
//!   non-finite coefficients) is never reported here; it is a model variant.
use chrono::NaiveDateTime;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for counterfactual operations.
pub type CFResult<T> = Result<T, CounterfactualError>;

/// Unified error type for counterfactual generation.
#[derive(Debug, Clone, PartialEq)]
pub enum CounterfactualError {
    // ---- Event windows ----
    /// Event start is not strictly before its end (or before the forecast end).
    InvalidEventWindow { event: String, start: NaiveDateTime, end: NaiveDateTime },

    /// The forecast grid for an event has no points.
    EmptyForecastWindow { event: String },

    // ---- History / data availability ----
    /// Fewer pre-event observations than the AR order requires.
    InsufficientHistory { required: usize, actual: usize },

    /// Every pre-event value of the target column is missing.
    AllMissingTarget { column: String },

    /// Fewer seed values than AR coefficients when projecting forward.
    InsufficientSeed { required: usize, actual: usize },

    // ---- Batches ----
    /// Every event in a batch was skipped.
    NoEventsProcessed { attempted: usize },

    /// Every entity in a multi-entity batch failed.
    NoEntitiesProcessed { attempted: usize },

    // ---- Frame structure ----
    /// Named column is not present in the frame.
    MissingColumn { column: String },

    /// No target column was configured and none could be implied.
    MissingTargetColumn,

    /// Timestamps must be strictly increasing; `index` is the first offender.
    UnsortedTimestamps { index: usize },

    /// Column length does not match the time axis length.
    LengthMismatch { column: String, expected: usize, actual: usize },

    /// A timestamp string could not be parsed.
    InvalidTimestamp { input: String },

    // ---- Options ----
    /// A configuration value is out of range.
    InvalidOption { name: &'static str, reason: &'static str },
}

impl CounterfactualError {
    /// Whether batch generation may skip an event that failed with this error.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            CounterfactualError::InvalidEventWindow { .. }
                | CounterfactualError::InsufficientHistory { .. }
                | CounterfactualError::AllMissingTarget { .. }
                | CounterfactualError::EmptyForecastWindow { .. }
        )
    }
}

impl std::error::Error for CounterfactualError {}

impl std::fmt::Display for CounterfactualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Event windows ----
            CounterfactualError::InvalidEventWindow { event, start, end } => {
                write!(f, "Invalid event dates for {event}: start {start} >= end {end}")
            }
            CounterfactualError::EmptyForecastWindow { event } => {
                write!(f, "Empty forecast period for {event}")
            }
            // ---- History / data availability ----
            CounterfactualError::InsufficientHistory { required, actual } => {
                write!(f, "Need at least {required} pre-event observations, got {actual}")
            }
            CounterfactualError::AllMissingTarget { column } => {
                write!(f, "All values of '{column}' are missing in the pre-event window")
            }
            CounterfactualError::InsufficientSeed { required, actual } => {
                write!(f, "Need at least {required} seed values, got {actual}")
            }
            // ---- Batches ----
            CounterfactualError::NoEventsProcessed { attempted } => {
                write!(f, "No events could be processed ({attempted} attempted)")
            }
            CounterfactualError::NoEntitiesProcessed { attempted } => {
                write!(f, "No entities could be processed ({attempted} attempted)")
            }
            // ---- Frame structure ----
            CounterfactualError::MissingColumn { column } => {
                write!(f, "Column '{column}' not found")
            }
            CounterfactualError::MissingTargetColumn => {
                write!(f, "No target column configured and the frame has more than one column")
            }
            CounterfactualError::UnsortedTimestamps { index } => {
                write!(f, "Timestamps must be strictly increasing; violated at index {index}")
            }
            CounterfactualError::LengthMismatch { column, expected, actual } => {
                write!(f, "Column '{column}' has length {actual}, expected {expected}")
            }
            CounterfactualError::InvalidTimestamp { input } => {
                write!(f, "Could not parse timestamp: '{input}'")
            }
            // ---- Options ----
            CounterfactualError::InvalidOption { name, reason } => {
                write!(f, "Invalid option {name}: {reason}")
            }
        }
    }
}

/// Convert a [`CounterfactualError`] into a Python `ValueError`.
#[cfg(feature = "python-bindings")]
impl From<CounterfactualError> for PyErr {
    fn from(err: CounterfactualError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
