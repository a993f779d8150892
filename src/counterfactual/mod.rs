//! counterfactual — "what would have happened without the event" forecasts.
//!
//! Purpose
//! -------
//! Estimate the baseline a series would have followed had an event (a
//! festival, an outage, a policy change) not taken place. The history before
//! the event drives an AR(p) projection, a calendar-cycle adjustment, and a
//! small amount of seeded noise; the result spans the event and a
//! configurable post-event buffer.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds inputs with enforced invariants ([`TimeFrame`],
//!   [`Event`]), configuration ([`GeneratorOptions`]), grids, bounds, noise,
//!   and the shared AR recursion.
//! - [`models`] holds the AR estimator, the cyclical pattern extractor, and
//!   [`CounterfactualGenerator`] with its batch helpers.
//! - [`errors`] defines [`CounterfactualError`] and the [`CFResult`] alias.
//!
//! Invariants & assumptions
//! ------------------------
//! - All timestamps are timezone-naive once inside the crate.
//! - Output is a pure function of the inputs and options: noise is seeded
//!   from each event's name.
//!
//! Conventions
//! -----------
//! - Generation emits `tracing` events (debug for fits, warn for skipped
//!   events and entities); installing a subscriber is left to the caller.
//!
//! Downstream usage
//! ----------------
//! - Typical flow:
//!   1. Build a [`TimeFrame`] from timestamps and one or more value columns.
//!   2. Configure [`GeneratorOptions`] (or its builder) and construct a
//!      [`CounterfactualGenerator`].
//!   3. Call `generate` for one event, `generate_multiple` for a list of
//!      [`Event`]s, or `generate_entities` for many series at once.
//!   4. Compare the output against the observations with
//!      [`crate::analysis`].

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    CyclePeriod, Event, EventSet, Execution, Frequency, GeneratorOptions, TimeFrame, ValueBounds,
};

pub use self::errors::{CFResult, CounterfactualError};

pub use self::models::{
    ColumnOverrides, CounterfactualGenerator, Entity, EntityForecast, ForecastFrame,
    ForecastSeries,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use counterfactual_ts::counterfactual::prelude::*;
//
// to import the main counterfactual surface in a single line.

pub mod prelude {
    pub use super::{
        CFResult, ColumnOverrides, CounterfactualError, CounterfactualGenerator, CyclePeriod,
        Entity, EntityForecast, Event, EventSet, Execution, ForecastFrame, ForecastSeries,
        GeneratorOptions, TimeFrame, ValueBounds,
    };
}
