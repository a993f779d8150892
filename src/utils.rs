//! Python conversion helpers for the `python-bindings` feature.
//!
//! Everything here turns Python objects (datetimes, numpy arrays, pandas
//! series, plain sequences, keyword options) into the validated Rust types of
//! [`crate::counterfactual`], and converts results back.

#[cfg(feature = "python-bindings")]
use std::str::FromStr;

#[cfg(feature = "python-bindings")]
use chrono::{DateTime, FixedOffset, NaiveDateTime};

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyTypeError,
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Array1 / Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use crate::counterfactual::{
    core::{
        calendar::CyclePeriod,
        events::Event,
        frame::TimeFrame,
        options::{Execution, GeneratorOptions},
        timestamps::{IntoNaiveTimestamp, parse_timestamp},
    },
    models::output::ForecastFrame,
};

/// Column name given to values passed from Python without one.
#[cfg(feature = "python-bindings")]
pub const DEFAULT_VALUE_COLUMN: &str = "value";

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(series_ro);
        }
    }

    let vec: Vec<Option<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    let values: Vec<f64> = vec.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    Ok(values.into_pyarray(py).readonly())
}

/// One timestamp from a `datetime`, `date`, aware `datetime`, or string.
#[cfg(feature = "python-bindings")]
pub fn extract_timestamp(raw: &Bound<'_, PyAny>) -> PyResult<NaiveDateTime> {
    if let Ok(naive) = raw.extract::<NaiveDateTime>() {
        return Ok(naive);
    }
    if let Ok(aware) = raw.extract::<DateTime<FixedOffset>>() {
        return Ok(aware.into_naive());
    }
    if let Ok(date) = raw.extract::<chrono::NaiveDate>() {
        return Ok(date.into_naive());
    }
    if let Ok(text) = raw.extract::<String>() {
        return Ok(parse_timestamp(&text)?);
    }
    Err(PyTypeError::new_err("expected a datetime, date, or ISO-8601 string"))
}

#[cfg(feature = "python-bindings")]
pub fn extract_timestamps(raw: &Bound<'_, PyAny>) -> PyResult<Vec<NaiveDateTime>> {
    let mut out = Vec::new();
    for item in raw.try_iter()? {
        out.push(extract_timestamp(&item?)?);
    }
    Ok(out)
}

/// Single-column frame from Python timestamps and values.
#[cfg(feature = "python-bindings")]
pub fn build_frame<'py>(
    py: Python<'py>, timestamps: &Bound<'py, PyAny>, values: &Bound<'py, PyAny>,
    column: Option<&str>,
) -> PyResult<TimeFrame> {
    let timestamps = extract_timestamps(timestamps)?;
    let arr = extract_f64_array(py, values)?;
    let values: Array1<f64> = arr.as_array().to_owned();
    let frame = TimeFrame::new(timestamps)?.with_column(column.unwrap_or(DEFAULT_VALUE_COLUMN), values)?;
    Ok(frame)
}

/// Events from a sequence of `(start, end, name)` tuples.
#[cfg(feature = "python-bindings")]
pub fn extract_events(raw: &Bound<'_, PyAny>) -> PyResult<Vec<Event>> {
    let mut events = Vec::new();
    for item in raw.try_iter()? {
        let item = item?;
        let (start, end, name): (Bound<'_, PyAny>, Bound<'_, PyAny>, String) =
            item.extract().map_err(|_| {
                PyTypeError::new_err("events must be (start, end, name) tuples")
            })?;
        events.push(Event::new(extract_timestamp(&start)?, extract_timestamp(&end)?, name)?);
    }
    Ok(events)
}

#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn build_options(
    ar_order: usize, cycle_period: Option<&str>, auto_detect: bool, forecast_days: u32,
    min_value: Option<f64>, max_value: Option<f64>, noise_factor: f64, output_prefix: &str,
    time_column: Option<&str>, target_column: Option<&str>, parallel: bool,
) -> PyResult<GeneratorOptions> {
    let cycle_period = cycle_period.map(CyclePeriod::from_str).transpose()?;
    let execution = if parallel { Execution::Parallel } else { Execution::Sequential };

    let opts = GeneratorOptions {
        ar_order,
        cycle_period,
        auto_detect,
        forecast_days,
        min_value,
        max_value,
        noise_factor,
        output_prefix: output_prefix.to_string(),
        time_column: time_column.map(str::to_string),
        target_column: target_column.map(str::to_string),
        execution,
    };
    opts.validate()?;
    Ok(opts)
}

/// `{time_column: [datetime], <value column>: ndarray, ...}` with `NaN` for
/// missing cells.
#[cfg(feature = "python-bindings")]
pub fn forecast_frame_to_dict<'py>(
    py: Python<'py>, frame: &ForecastFrame,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item(frame.time_column(), frame.timestamps().to_vec())?;
    for name in frame.column_names() {
        if let Some(values) = frame.column(name) {
            dict.set_item(name, values.to_owned().into_pyarray(py))?;
        }
    }
    Ok(dict)
}
