//! Counterfactual validation helpers — reusable checks for orders, windows,
//! time axes, and configuration scalars.
//!
//! Purpose
//! -------
//! Centralize the small validation routines used across the counterfactual
//! stack so constructors (`TimeFrame`, `GeneratorOptions`,
//! `AutoregressiveModel`, `ValueBounds`) and the generator fail fast with
//! structured errors instead of panicking deep inside a recursion.
//!
//! Conventions
//! -----------
//! - Every helper returns [`CFResult`] and never panics on invalid inputs.
//! - Helpers return the validated value where that makes call sites shorter.
//! - No logging happens here; callers decide whether a failure is skippable.
use chrono::NaiveDateTime;

use crate::counterfactual::errors::{CFResult, CounterfactualError};

/// Validate an autoregressive order (`order >= 1`).
///
/// # Errors
/// Returns [`CounterfactualError::InvalidOption`] for `order == 0`.
pub fn validate_ar_order(order: usize) -> CFResult<usize> {
    if order == 0 {
        return Err(CounterfactualError::InvalidOption {
            name: "ar_order",
            reason: "AR order must be at least 1.",
        });
    }
    Ok(order)
}

/// Validate the noise scale factor (finite, within `[0, 1]`).
pub fn validate_noise_factor(factor: f64) -> CFResult<f64> {
    if !factor.is_finite() {
        return Err(CounterfactualError::InvalidOption {
            name: "noise_factor",
            reason: "Noise factor must be finite.",
        });
    }
    if !(0.0..=1.0).contains(&factor) {
        return Err(CounterfactualError::InvalidOption {
            name: "noise_factor",
            reason: "Noise factor must lie in [0, 1].",
        });
    }
    Ok(factor)
}

/// Validate that the history holds at least `required` observations.
///
/// # Errors
/// Returns [`CounterfactualError::InsufficientHistory`] otherwise.
pub fn validate_history_len(required: usize, actual: usize) -> CFResult<()> {
    if actual < required {
        return Err(CounterfactualError::InsufficientHistory { required, actual });
    }
    Ok(())
}

/// Validate that an event window is non-empty (`start < end`).
pub fn validate_event_window(event: &str, start: NaiveDateTime, end: NaiveDateTime) -> CFResult<()> {
    if start >= end {
        return Err(CounterfactualError::InvalidEventWindow { event: event.to_string(), start, end });
    }
    Ok(())
}

/// Validate that a time axis is strictly increasing.
///
/// # Errors
/// Returns [`CounterfactualError::UnsortedTimestamps`] carrying the index of
/// the first timestamp that is not strictly after its predecessor.
pub fn validate_strictly_increasing(timestamps: &[NaiveDateTime]) -> CFResult<()> {
    match timestamps.windows(2).position(|w| w[0] >= w[1]) {
        Some(i) => Err(CounterfactualError::UnsortedTimestamps { index: i + 1 }),
        None => Ok(()),
    }
}

/// Validate that a column has one value per timestamp.
pub fn validate_column_length(column: &str, expected: usize, actual: usize) -> CFResult<()> {
    if expected != actual {
        return Err(CounterfactualError::LengthMismatch {
            column: column.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Accept/reject behavior of every helper at its boundary.
    //
    // They intentionally DO NOT cover:
    // - How callers react to the errors (skipping vs. aborting), which is
    //   tested in the generator.
    // -------------------------------------------------------------------------

    fn hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn ar_order_must_be_positive() {
        assert_eq!(validate_ar_order(3).unwrap(), 3);
        assert!(matches!(
            validate_ar_order(0),
            Err(CounterfactualError::InvalidOption { name: "ar_order", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Noise factor accepts the closed unit interval and rejects everything else.
    fn noise_factor_boundaries() {
        assert_eq!(validate_noise_factor(0.0).unwrap(), 0.0);
        assert_eq!(validate_noise_factor(1.0).unwrap(), 1.0);
        for bad in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(validate_noise_factor(bad).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn history_len_reports_required_and_actual() {
        assert!(validate_history_len(2, 2).is_ok());
        assert_eq!(
            validate_history_len(3, 1),
            Err(CounterfactualError::InsufficientHistory { required: 3, actual: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // The first non-increasing position is reported, not the last.
    //
    // Given
    // -----
    // - Hours [0, 1, 1, 0].
    //
    // Expect
    // ------
    // - `UnsortedTimestamps { index: 2 }`.
    fn strictly_increasing_reports_first_offender() {
        assert!(validate_strictly_increasing(&[]).is_ok());
        assert!(validate_strictly_increasing(&[hour(0), hour(1), hour(5)]).is_ok());
        assert_eq!(
            validate_strictly_increasing(&[hour(0), hour(1), hour(1), hour(0)]),
            Err(CounterfactualError::UnsortedTimestamps { index: 2 })
        );
    }

    #[test]
    fn event_window_and_column_length() {
        assert!(validate_event_window("a", hour(0), hour(1)).is_ok());
        assert!(validate_event_window("a", hour(1), hour(1)).is_err());
        assert!(validate_column_length("pm25", 4, 4).is_ok());
        assert_eq!(
            validate_column_length("pm25", 4, 3),
            Err(CounterfactualError::LengthMismatch {
                column: "pm25".to_string(),
                expected: 4,
                actual: 3
            })
        );
    }
}
