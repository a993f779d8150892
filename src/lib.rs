//! counterfactual_ts — counterfactual baselines for event windows, with
//! Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the counterfactual generator to Python via the
//! `_counterfactual_ts` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`counterfactual` and `analysis`) as
//!   the public crate surface.
//! - Define the `#[pyclass]` wrapper and the `#[pymodule]` initializer for
//!   the `_counterfactual_ts` Python extension when the `python-bindings`
//!   feature is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue and error mapping.
//! - Python timestamps are normalized to naive wall-clock instants on entry.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are converted to `ValueError` at the PyO3
//!   boundary; malformed Python inputs raise `TypeError`.
//! - Forecast tables cross the boundary as a `dict` mapping column names to
//!   a list of `datetime`s (time column) or a `float64` ndarray (value
//!   columns, `NaN` where missing).
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`counterfactual`] and [`analysis`]
//!   and can ignore the PyO3 items guarded by `python-bindings`.

pub mod analysis;
pub mod counterfactual;
pub mod utils;

#[cfg(feature = "python-bindings")]
use chrono::NaiveDateTime;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use crate::{
    counterfactual::models::generator::{ColumnOverrides, CounterfactualGenerator},
    utils::{build_frame, build_options, extract_events, extract_timestamp, forecast_frame_to_dict},
};

/// CounterfactualGenerator — Python-facing wrapper for the generator.
///
/// Purpose
/// -------
/// Expose [`CounterfactualGenerator`] to Python with keyword configuration
/// and plain datetime / array inputs.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `CounterfactualGenerator(ar_order=1, cycle_period=None, auto_detect=True,
/// forecast_days=5, min_value=None, max_value=None, noise_factor=0.5,
/// output_prefix="counterfactual", time_column=None, target_column=None,
/// parallel=False)`.
///
/// Notes
/// -----
/// - `cycle_period` accepts `"hour"`, `"day"`, `"week"`, `"month"`,
///   `"day_of_year"`, `"quarter"`.
/// - Native Rust code should use [`CounterfactualGenerator`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "CounterfactualGenerator", module = "counterfactual_ts")]
pub struct PyCounterfactualGenerator {
    inner: CounterfactualGenerator,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyCounterfactualGenerator {
    #[new]
    #[pyo3(
        signature = (
            ar_order = 1,
            cycle_period = None,
            auto_detect = true,
            forecast_days = 5,
            min_value = None,
            max_value = None,
            noise_factor = 0.5,
            output_prefix = "counterfactual",
            time_column = None,
            target_column = None,
            parallel = false,
        ),
        text_signature = "(ar_order=1, cycle_period=None, auto_detect=True, forecast_days=5, \
                          min_value=None, max_value=None, noise_factor=0.5, \
                          output_prefix='counterfactual', time_column=None, \
                          target_column=None, parallel=False)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ar_order: usize, cycle_period: Option<&str>, auto_detect: bool, forecast_days: u32,
        min_value: Option<f64>, max_value: Option<f64>, noise_factor: f64, output_prefix: &str,
        time_column: Option<&str>, target_column: Option<&str>, parallel: bool,
    ) -> PyResult<Self> {
        let opts = build_options(
            ar_order,
            cycle_period,
            auto_detect,
            forecast_days,
            min_value,
            max_value,
            noise_factor,
            output_prefix,
            time_column,
            target_column,
            parallel,
        )?;
        Ok(PyCounterfactualGenerator { inner: CounterfactualGenerator::new(opts)? })
    }

    /// Counterfactual for one event.
    ///
    /// Returns `(timestamps, values)`: a list of `datetime` and a float64
    /// ndarray of the same length.
    #[pyo3(signature = (timestamps, values, event_start, event_end, event_name))]
    pub fn generate<'py>(
        &self, py: Python<'py>, timestamps: &Bound<'py, PyAny>, values: &Bound<'py, PyAny>,
        event_start: &Bound<'py, PyAny>, event_end: &Bound<'py, PyAny>, event_name: &str,
    ) -> PyResult<(Vec<NaiveDateTime>, Bound<'py, PyArray1<f64>>)> {
        let target = self.inner.options().target_column.as_deref();
        let frame = build_frame(py, timestamps, values, target)?;
        let start = extract_timestamp(event_start)?;
        let end = extract_timestamp(event_end)?;

        let series = py.allow_threads(|| {
            self.inner.generate(&frame, start, end, event_name, ColumnOverrides::default())
        })?;
        Ok((series.timestamps().to_vec(), series.values().to_owned().into_pyarray(py)))
    }

    /// Counterfactuals for `(start, end, name)` events, outer-joined on time.
    ///
    /// Returns a `dict` with the time column and one value column per
    /// processed event.
    #[pyo3(signature = (timestamps, values, events))]
    pub fn generate_multiple<'py>(
        &self, py: Python<'py>, timestamps: &Bound<'py, PyAny>, values: &Bound<'py, PyAny>,
        events: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let target = self.inner.options().target_column.as_deref();
        let frame = build_frame(py, timestamps, values, target)?;
        let events = extract_events(events)?;

        let merged = py.allow_threads(|| {
            self.inner.generate_multiple(&frame, &events, ColumnOverrides::default())
        })?;
        forecast_frame_to_dict(py, &merged)
    }

    #[getter]
    pub fn ar_order(&self) -> usize {
        self.inner.options().ar_order
    }

    #[getter]
    pub fn forecast_days(&self) -> u32 {
        self.inner.options().forecast_days
    }

    #[getter]
    pub fn noise_factor(&self) -> f64 {
        self.inner.options().noise_factor
    }

    #[getter]
    pub fn cycle_period(&self) -> Option<&'static str> {
        self.inner.options().cycle_period.map(|p| p.name())
    }
}

/// _counterfactual_ts — PyO3 module initializer for the Python extension.
///
/// Invoked by Python when importing the compiled extension; registers the
/// generator class.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _counterfactual_ts<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PyCounterfactualGenerator>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
