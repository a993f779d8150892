//! core — shared building blocks for counterfactual generation.
//!
//! Purpose
//! -------
//! Collect the primitives the counterfactual models build on: events and the
//! validated input frame, timestamp normalization, calendar granularities,
//! sampling-frequency inference and forecast grids, clamping bounds, seeded
//! noise, configuration, validation helpers, and the shared AR recursion.
//!
//! Key behaviors
//! -------------
//! - Normalize every external timestamp to a timezone-naive instant
//!   ([`IntoNaiveTimestamp`], [`parse_timestamp`]).
//! - Represent inputs with enforced invariants ([`Event`], [`EventSet`],
//!   [`TimeFrame`]) so models can assume well-formed data.
//! - Lay out forecast timelines ([`Frequency`]) and pick seasonal
//!   granularities ([`CyclePeriod`], [`detect_cycle_period`]).
//! - Roll AR(p) projections forward ([`forecast_with_adjustments`]) with
//!   optional seeded noise ([`NoiseSource`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Timestamps inside the core are always `chrono::NaiveDateTime`.
//! - Missing observations are `NaN`.
//! - Lag windows and AR coefficient vectors are ordered oldest → newest.
//!
//! Conventions
//! -----------
//! - This module performs no I/O and no logging; errors are reported via
//!   `CFResult`.
//!
//! Downstream usage
//! ----------------
//! - `counterfactual::models` depends on the re-exports below or on the
//!   [`prelude`] rather than reaching into submodules directly.

pub mod bounds;
pub mod calendar;
pub mod events;
pub mod forecasts;
pub mod frame;
pub mod frequency;
pub mod noise;
pub mod options;
pub mod timestamps;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bounds::ValueBounds;
pub use self::calendar::CyclePeriod;
pub use self::events::{Event, EventSet};
pub use self::forecasts::{forecast, forecast_with_adjustments};
pub use self::frame::{DEFAULT_INDEX_NAME, TimeFrame};
pub use self::frequency::{Frequency, detect_cycle_period, median_gap};
pub use self::noise::{NoiseSource, seed_from_name};
pub use self::options::{Execution, GeneratorOptions, GeneratorOptionsBuilder};
pub use self::timestamps::{IntoNaiveTimestamp, parse_timestamp};
pub use self::validation::{
    validate_ar_order, validate_column_length, validate_event_window, validate_history_len,
    validate_noise_factor, validate_strictly_increasing,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use counterfactual_ts::counterfactual::core::prelude::*;
//
// to import the main core surface in a single line.

pub mod prelude {
    pub use super::bounds::ValueBounds;
    pub use super::calendar::CyclePeriod;
    pub use super::events::{Event, EventSet};
    pub use super::frame::TimeFrame;
    pub use super::frequency::Frequency;
    pub use super::noise::NoiseSource;
    pub use super::options::{Execution, GeneratorOptions};
    pub use super::timestamps::IntoNaiveTimestamp;
}
