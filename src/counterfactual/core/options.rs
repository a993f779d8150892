//! Generator options — configuration for counterfactual generation.
//!
//! Purpose
//! -------
//! Collect every knob of the counterfactual workflow in one serializable
//! struct so runs are explicit and reproducible: AR order, seasonal
//! granularity, horizon buffer, clamping range, noise scale, output naming,
//! column defaults, and the execution strategy for batches.
//!
//! Key behaviors
//! -------------
//! - [`GeneratorOptions::default`] reproduces the documented defaults
//!   (AR(1), auto-detected cycle, 5-day buffer, noise factor 0.5, prefix
//!   `"counterfactual"`, sequential execution).
//! - [`GeneratorOptions::builder`] offers chained setters and validates on
//!   [`GeneratorOptionsBuilder::build`].
//! - [`GeneratorOptions::validate`] re-checks a value obtained any other way
//!   (e.g., deserialized from JSON); the generator calls it on construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ar_order >= 1`.
//! - `noise_factor` is finite and within `[0, 1]`.
//! - `min_value`/`max_value`, when present, are finite and ordered.
//!
//! Conventions
//! -----------
//! - `cycle_period = None` means "auto-detect when `auto_detect` is set,
//!   otherwise hourly".
//! - Serde uses `#[serde(default)]`, so partial documents fill the remaining
//!   fields from the defaults.
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::counterfactual::{
    core::{
        bounds::ValueBounds,
        calendar::CyclePeriod,
        validation::{validate_ar_order, validate_noise_factor},
    },
    errors::CFResult,
};

/// Execution — how batches of events or entities are processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    /// One item after another on the calling thread.
    #[default]
    Sequential,
    /// Items fanned out on the global `rayon` pool; results are merged in
    /// input order afterwards.
    Parallel,
}

/// GeneratorOptions — full configuration of a `CounterfactualGenerator`.
///
/// Fields
/// ------
/// - `ar_order`: autoregressive order `p` (≥ 1).
/// - `cycle_period`: fixed seasonal granularity, or `None` to detect it.
/// - `auto_detect`: detect the granularity from the sampling gap when
///   `cycle_period` is `None`.
/// - `forecast_days`: whole days appended after the event end.
/// - `min_value`, `max_value`: optional clamps applied last.
/// - `noise_factor`: multiplier on the residual std for injected noise;
///   `0.0` disables noise.
/// - `output_prefix`: value column is named `"<prefix>_<event name>"`.
/// - `time_column`: output time column name; defaults to the frame's index
///   name.
/// - `target_column`: input column to model; defaults to the frame's only
///   column.
/// - `execution`: sequential or parallel batch processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub ar_order: usize,
    pub cycle_period: Option<CyclePeriod>,
    pub auto_detect: bool,
    pub forecast_days: u32,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub noise_factor: f64,
    pub output_prefix: String,
    pub time_column: Option<String>,
    pub target_column: Option<String>,
    pub execution: Execution,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            ar_order: 1,
            cycle_period: None,
            auto_detect: true,
            forecast_days: 5,
            min_value: None,
            max_value: None,
            noise_factor: 0.5,
            output_prefix: "counterfactual".to_string(),
            time_column: None,
            target_column: None,
            execution: Execution::Sequential,
        }
    }
}

impl GeneratorOptions {
    pub fn builder() -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder::default()
    }

    /// Check every field invariant.
    ///
    /// # Errors
    /// Returns `CounterfactualError::InvalidOption` naming the first bad field.
    pub fn validate(&self) -> CFResult<()> {
        validate_ar_order(self.ar_order)?;
        validate_noise_factor(self.noise_factor)?;
        self.bounds()?;
        Ok(())
    }

    /// Validated clamping range.
    pub fn bounds(&self) -> CFResult<ValueBounds> {
        ValueBounds::new(self.min_value, self.max_value)
    }

    /// Trailing buffer appended after the event end.
    pub fn forecast_buffer(&self) -> TimeDelta {
        TimeDelta::days(i64::from(self.forecast_days))
    }

    /// Output column name for an event.
    pub fn value_column(&self, event_name: &str) -> String {
        format!("{}_{}", self.output_prefix, event_name)
    }
}

/// Chained construction of [`GeneratorOptions`], validated on `build`.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptionsBuilder {
    opts: GeneratorOptions,
}

impl GeneratorOptionsBuilder {
    pub fn ar_order(mut self, order: usize) -> Self {
        self.opts.ar_order = order;
        self
    }

    pub fn cycle_period(mut self, period: CyclePeriod) -> Self {
        self.opts.cycle_period = Some(period);
        self
    }

    pub fn auto_detect(mut self, enabled: bool) -> Self {
        self.opts.auto_detect = enabled;
        self
    }

    pub fn forecast_days(mut self, days: u32) -> Self {
        self.opts.forecast_days = days;
        self
    }

    pub fn min_value(mut self, min: f64) -> Self {
        self.opts.min_value = Some(min);
        self
    }

    pub fn max_value(mut self, max: f64) -> Self {
        self.opts.max_value = Some(max);
        self
    }

    pub fn noise_factor(mut self, factor: f64) -> Self {
        self.opts.noise_factor = factor;
        self
    }

    pub fn output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.opts.output_prefix = prefix.into();
        self
    }

    pub fn time_column(mut self, name: impl Into<String>) -> Self {
        self.opts.time_column = Some(name.into());
        self
    }

    pub fn target_column(mut self, name: impl Into<String>) -> Self {
        self.opts.target_column = Some(name.into());
        self
    }

    pub fn execution(mut self, execution: Execution) -> Self {
        self.opts.execution = execution;
        self
    }

    /// Validate and return the options.
    ///
    /// # Errors
    /// Returns `CounterfactualError::InvalidOption` for out-of-range fields.
    pub fn build(self) -> CFResult<GeneratorOptions> {
        self.opts.validate()?;
        Ok(self.opts)
    }
}
