//! models — AR(p) estimation, cyclical patterns, and the counterfactual
//! generator.
//!
//! Purpose
//! -------
//! Turn the primitives in `counterfactual::core` into counterfactual
//! forecasts: fit an autoregressive model on the pre-event window, extract
//! its calendar cycle, and project both across the event and the
//! post-event buffer.
//!
//! Key behaviors
//! -------------
//! - [`AutoregressiveModel`] fits AR(p) by least squares and reports
//!   numerically degenerate histories as [`ArFit::Degenerate`] (mean-only
//!   forecast) instead of an error.
//! - [`CyclicalPatternExtractor`] builds a dense per-period deviation table
//!   ([`CyclicalPattern`]) and applies it to forecast timestamps.
//! - [`CounterfactualGenerator`] runs the per-event pipeline and its batch
//!   forms (`generate_multiple`, `generate_entities`), producing
//!   [`ForecastSeries`] and merged [`ForecastFrame`]s.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only non-missing pre-event values enter the AR fit, the recursion seed,
//!   and the pattern.
//! - Batch output order follows input order under both execution modes.
//!
//! Conventions
//! -----------
//! - Errors are reported as [`CFResult`](crate::counterfactual::errors::CFResult).
//!   Per-event data problems are skipped by batch helpers with a
//!   `tracing::warn!`; configuration and column errors abort.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each model. End-to-end scenarios are in
//!   `tests/integration_counterfactual_pipeline.rs`.

pub mod ar;
pub mod batch;
pub mod generator;
pub mod output;
pub mod patterns;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::ar::{ArFit, ArParams, AutoregressiveModel, CONSTANT_HISTORY_TOL, DegenerateReason};
pub use self::batch::{Entity, EntityForecast};
pub use self::generator::{ColumnOverrides, CounterfactualGenerator};
pub use self::output::{ForecastFrame, ForecastSeries};
pub use self::patterns::{CyclicalPattern, CyclicalPatternExtractor};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use counterfactual_ts::counterfactual::models::prelude::*;
//
// to import the main model surface in a single line.

pub mod prelude {
    pub use super::ar::{ArFit, AutoregressiveModel};
    pub use super::batch::{Entity, EntityForecast};
    pub use super::generator::{ColumnOverrides, CounterfactualGenerator};
    pub use super::output::{ForecastFrame, ForecastSeries};
    pub use super::patterns::CyclicalPatternExtractor;
}
