//! analysis — measuring an event's effect against its counterfactual.
//!
//! Purpose
//! -------
//! Compare observed data with the output of
//! [`CounterfactualGenerator`](crate::counterfactual::CounterfactualGenerator):
//! align both on time, compute `actual − counterfactual`, and summarize the
//! differences overall and per timestamp across entities.
//!
//! Key behaviors
//! -------------
//! - [`calculate_differences`] inner-joins one observed column with one
//!   forecast column.
//! - [`SummaryStatistics`] describes a set of differences (mean, median,
//!   sample std, range, quartiles, sign counts and percentages).
//! - [`aggregate_by_time`] summarizes, per timestamp, the differences of
//!   several entities.
//! - [`compare`] bundles the three for a single series.
//!
//! Conventions
//! -----------
//! - Missing values (`NaN`) never enter a statistic.
//! - Errors are reported as [`AnalysisResult`]; an empty overlap is a valid,
//!   empty result.

pub mod differences;
pub mod errors;
pub mod statistics;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::differences::{
    Comparison, DifferenceRow, DifferenceSeries, TimeAggregate, aggregate_by_time,
    calculate_differences, compare,
};
pub use self::errors::{AnalysisError, AnalysisResult};
pub use self::statistics::SummaryStatistics;
