//! analysis::errors — error type for actual-vs-counterfactual comparisons.
//!
//! Comparisons fail only when a requested column does not exist on one of the
//! two sides. An empty overlap is not an error: it yields an empty
//! [`DifferenceSeries`](super::differences::DifferenceSeries) whose summary
//! is `None`.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// AnalysisError — failures while aligning observations with forecasts.
///
/// Variants
/// --------
/// - `MissingActualColumn { column }`
///   The observed frame has no column with this name.
/// - `MissingForecastColumn { column }`
///   The forecast frame has no column with this name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    MissingActualColumn { column: String },
    MissingForecastColumn { column: String },
}

impl std::error::Error for AnalysisError {}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::MissingActualColumn { column } => {
                write!(f, "Observed data has no column '{column}'.")
            }
            AnalysisError::MissingForecastColumn { column } => {
                write!(f, "Forecast has no column '{column}'.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<AnalysisError> for PyErr {
    fn from(err: AnalysisError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_column_and_side() {
        let actual = AnalysisError::MissingActualColumn { column: "pm25".into() };
        let forecast = AnalysisError::MissingForecastColumn { column: "counterfactual_a".into() };

        assert!(actual.to_string().contains("Observed"));
        assert!(actual.to_string().contains("pm25"));
        assert!(forecast.to_string().contains("counterfactual_a"));
    }
}
