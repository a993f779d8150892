//! Counterfactual generator — per-event forecasts and multi-event batches.
//!
//! Purpose
//! -------
//! Orchestrate the counterfactual pipeline for one event: slice the
//! pre-event window, fit the AR model and the cyclical pattern on it, lay
//! out the forecast timeline, project, add seeded noise, and clamp. Batch
//! helpers repeat this over many events and merge the results.
//!
//! Key behaviors
//! -------------
//! - [`CounterfactualGenerator::generate`] returns one [`ForecastSeries`]
//!   covering `[event_start, event_end + forecast_days]` on the inferred
//!   sampling grid.
//! - [`CounterfactualGenerator::generate_multiple`] skips events that fail
//!   with a skippable error (logged with `tracing::warn!`), aborts on any
//!   other error, and outer-joins the survivors into a [`ForecastFrame`].
//! - Under [`Execution::Parallel`] events are generated on the `rayon` pool;
//!   results are merged in input order, so output is identical to the
//!   sequential run.
//!
//! Invariants & assumptions
//! ------------------------
//! - The frame's timestamps are strictly increasing and timezone-naive
//!   (enforced by `TimeFrame`).
//! - Each event derives its own noise stream from its name; no RNG state is
//!   shared between events or calls.
//! - The AR fit, the seed window, and the pattern use only non-missing
//!   pre-event target values; NaN and ±∞ both count as missing.
//!
//! Conventions
//! -----------
//! - The value column is `"<output_prefix>_<event name>"`.
//! - The time column is the per-call override, else the configured
//!   `time_column`, else the frame's index name.
//! - The target column is the per-call override, else the configured
//!   `target_column`, else the frame's only column.
use chrono::NaiveDateTime;
use ndarray::{ArrayView1, s};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::counterfactual::{
    core::{
        bounds::ValueBounds,
        calendar::CyclePeriod,
        events::Event,
        forecasts::forecast_with_adjustments,
        frame::TimeFrame,
        frequency::{Frequency, detect_cycle_period},
        noise::NoiseSource,
        options::{Execution, GeneratorOptions},
        timestamps::IntoNaiveTimestamp,
        validation::{validate_event_window, validate_history_len},
    },
    errors::{CFResult, CounterfactualError},
    models::{
        ar::AutoregressiveModel,
        output::{ForecastFrame, ForecastSeries},
        patterns::CyclicalPatternExtractor,
    },
};

/// Per-call column overrides; unset fields fall back to the options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnOverrides<'a> {
    pub time: Option<&'a str>,
    pub target: Option<&'a str>,
}

impl<'a> ColumnOverrides<'a> {
    pub fn target(name: &'a str) -> Self {
        ColumnOverrides { time: None, target: Some(name) }
    }

    pub fn with_time(mut self, name: &'a str) -> Self {
        self.time = Some(name);
        self
    }
}

/// CounterfactualGenerator — AR(p) + cyclical-pattern counterfactuals.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterfactualGenerator {
    options: GeneratorOptions,
    bounds: ValueBounds,
}

impl CounterfactualGenerator {
    /// # Errors
    /// Returns `CounterfactualError::InvalidOption` if the options fail
    /// validation.
    pub fn new(options: GeneratorOptions) -> CFResult<Self> {
        options.validate()?;
        let bounds = options.bounds()?;
        Ok(CounterfactualGenerator { options, bounds })
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Counterfactual for one event.
    ///
    /// Parameters
    /// ----------
    /// - `frame`: cleaned observations.
    /// - `event_start`, `event_end`: event boundaries; aware timestamps are
    ///   normalized to their local wall-clock reading.
    /// - `event_name`: names the output column and seeds the noise.
    /// - `columns`: per-call time/target column overrides.
    ///
    /// Returns
    /// -------
    /// `CFResult<ForecastSeries>` with columns
    /// `[time, "<prefix>_<event_name>"]` and one row per grid point in
    /// `[event_start, event_end + forecast_days]`.
    ///
    /// # Errors
    /// - `InvalidEventWindow` if `start >= end`, if `start >= forecast_end`, or
    ///   if `end + forecast_days` is past the last representable timestamp.
    /// - `MissingTargetColumn` / `MissingColumn` for target resolution.
    /// - `InsufficientHistory` if fewer than `ar_order + 1` pre-event rows
    ///   (or non-missing values) exist.
    /// - `AllMissingTarget` if the pre-event target is entirely missing.
    /// - `EmptyForecastWindow` if the grid has no points.
    pub fn generate(
        &self, frame: &TimeFrame, event_start: impl IntoNaiveTimestamp,
        event_end: impl IntoNaiveTimestamp, event_name: &str, columns: ColumnOverrides<'_>,
    ) -> CFResult<ForecastSeries> {
        let start = event_start.into_naive();
        let end = event_end.into_naive();
        validate_event_window(event_name, start, end)?;

        let target = self.resolve_target(frame, columns)?;
        frame.column(target)?;

        let order = self.options.ar_order;
        let pre_event = frame.before(start);
        validate_history_len(order + 1, pre_event.len())?;
        let (_, observed) = pre_event.observed(target)?;
        if observed.is_empty() {
            return Err(CounterfactualError::AllMissingTarget { column: target.to_string() });
        }

        let cycle = self.cycle_period(pre_event.timestamps());
        let observed = ArrayView1::from(&observed);
        let fit = AutoregressiveModel::new(order)?.fit(observed)?;
        let extractor = CyclicalPatternExtractor::new(cycle);
        let pattern = extractor.extract(&pre_event, target)?;
        let frequency = Frequency::infer(pre_event.timestamps());

        let Some(forecast_end) = end.checked_add_signed(self.options.forecast_buffer()) else {
            return Err(CounterfactualError::InvalidEventWindow {
                event: event_name.to_string(),
                start,
                end,
            });
        };
        if start >= forecast_end {
            return Err(CounterfactualError::InvalidEventWindow {
                event: event_name.to_string(),
                start,
                end: forecast_end,
            });
        }
        let grid = frequency.grid(start, forecast_end);
        if grid.is_empty() {
            return Err(CounterfactualError::EmptyForecastWindow { event: event_name.to_string() });
        }

        let params = fit.params();
        let adjustments = extractor.apply(&pattern, &grid);
        let seed = observed.slice(s![observed.len() - order..]);
        let mut values =
            forecast_with_adjustments(seed, params.c, params.phi.view(), adjustments.view(), None)?;

        let noise_std = params.residual_std * self.options.noise_factor;
        if let Some(mut noise) = NoiseSource::for_event(event_name, noise_std) {
            values.iter_mut().for_each(|v| *v += noise.draw());
        }
        self.bounds.clamp_in_place(values.view_mut());

        debug!(
            event = event_name,
            order,
            ?cycle,
            ?frequency,
            points = grid.len(),
            degenerate = fit.is_degenerate(),
            residual_std = params.residual_std,
            "generated counterfactual"
        );

        let time_column = columns
            .time
            .or(self.options.time_column.as_deref())
            .unwrap_or(frame.index_name())
            .to_string();
        Ok(ForecastSeries::new(time_column, self.options.value_column(event_name), grid, values))
    }

    /// [`generate`](Self::generate) for an [`Event`].
    pub fn generate_event(
        &self, frame: &TimeFrame, event: &Event, columns: ColumnOverrides<'_>,
    ) -> CFResult<ForecastSeries> {
        self.generate(frame, event.start(), event.end(), event.name(), columns)
    }

    /// Counterfactuals for several events, outer-joined on time.
    ///
    /// # Errors
    /// - Any non-skippable error from an individual event.
    /// - `NoEventsProcessed` if every event was skipped (or `events` is empty).
    pub fn generate_multiple(
        &self, frame: &TimeFrame, events: &[Event], columns: ColumnOverrides<'_>,
    ) -> CFResult<ForecastFrame> {
        let outcomes: Vec<CFResult<ForecastSeries>> = match self.options.execution {
            Execution::Sequential => {
                events.iter().map(|event| self.generate_event(frame, event, columns)).collect()
            }
            Execution::Parallel => {
                events.par_iter().map(|event| self.generate_event(frame, event, columns)).collect()
            }
        };

        let mut series = Vec::with_capacity(events.len());
        for (event, outcome) in events.iter().zip(outcomes) {
            match outcome {
                Ok(s) => series.push(s),
                Err(err) if err.is_skippable() => {
                    warn!(event = event.name(), error = %err, "skipping event");
                }
                Err(err) => return Err(err),
            }
        }

        if series.is_empty() {
            return Err(CounterfactualError::NoEventsProcessed { attempted: events.len() });
        }
        debug!(processed = series.len(), attempted = events.len(), "merging event forecasts");
        Ok(ForecastFrame::merge(&series))
    }

    fn resolve_target<'f>(
        &'f self, frame: &'f TimeFrame, columns: ColumnOverrides<'f>,
    ) -> CFResult<&'f str> {
        columns
            .target
            .or(self.options.target_column.as_deref())
            .or_else(|| frame.sole_column_name())
            .ok_or(CounterfactualError::MissingTargetColumn)
    }

    fn cycle_period(&self, pre_event: &[NaiveDateTime]) -> CyclePeriod {
        match self.options.cycle_period {
            Some(period) => period,
            None if self.options.auto_detect => detect_cycle_period(pre_event),
            None => CyclePeriod::Hour,
        }
    }
}
