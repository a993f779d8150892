//! Value bounds — optional lower/upper clamps for forecast values.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the clamping range applied to
//! every counterfactual value after noise is added, so physically impossible
//! values (e.g., negative concentrations) never leave the generator.
//!
//! Invariants & assumptions
//! ------------------------
//! - Each bound is optional; a missing bound leaves that side unclamped.
//! - Present bounds are finite and satisfy `min <= max`.
//! - `NaN` inputs pass through `clamp` unchanged.
use ndarray::ArrayViewMut1;
use serde::{Deserialize, Serialize};

use crate::counterfactual::errors::{CFResult, CounterfactualError};

/// ValueBounds — optional `[min, max]` clamp range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValueBounds {
    /// No clamping on either side.
    pub const UNBOUNDED: ValueBounds = ValueBounds { min: None, max: None };

    /// Construct validated bounds.
    ///
    /// # Errors
    /// Returns [`CounterfactualError::InvalidOption`] when a bound is not
    /// finite or when `min > max`.
    pub fn new(min: Option<f64>, max: Option<f64>) -> CFResult<Self> {
        if min.is_some_and(|v| !v.is_finite()) {
            return Err(CounterfactualError::InvalidOption {
                name: "min_value",
                reason: "Lower bound must be finite.",
            });
        }
        if max.is_some_and(|v| !v.is_finite()) {
            return Err(CounterfactualError::InvalidOption {
                name: "max_value",
                reason: "Upper bound must be finite.",
            });
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(CounterfactualError::InvalidOption {
                    name: "min_value",
                    reason: "Lower bound must not exceed the upper bound.",
                });
            }
        }
        Ok(ValueBounds { min, max })
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Clamp one value into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        let v = match self.min {
            Some(lo) if value < lo => lo,
            _ => value,
        };
        match self.max {
            Some(hi) if v > hi => hi,
            _ => v,
        }
    }

    /// Clamp every element in place.
    pub fn clamp_in_place(&self, mut values: ArrayViewMut1<'_, f64>) {
        if self.is_unbounded() {
            return;
        }
        values.mapv_inplace(|v| self.clamp(v));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation of `ValueBounds::new` (finiteness, ordering).
    // - One-sided and two-sided clamping, and NaN pass-through.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Reject inverted or non-finite bounds; accept equal bounds.
    fn new_validates_bounds() {
        assert!(ValueBounds::new(Some(0.0), Some(0.0)).is_ok());
        assert!(ValueBounds::new(None, None).unwrap().is_unbounded());
        for (lo, hi) in [
            (Some(5.0), Some(1.0)),
            (Some(f64::NAN), None),
            (None, Some(f64::INFINITY)),
        ] {
            assert!(
                matches!(ValueBounds::new(lo, hi), Err(CounterfactualError::InvalidOption { .. })),
                "accepted ({lo:?}, {hi:?})"
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Clamping respects whichever sides are set.
    //
    // Given
    // -----
    // - Values [-3, 0.5, 12, NaN].
    //
    // Expect
    // ------
    // - [0, 10]: [0, 0.5, 10, NaN].
    // - [0, ∞):  [0, 0.5, 12, NaN].
    fn clamp_in_place_respects_each_side() {
        let mut values = array![-3.0, 0.5, 12.0, f64::NAN];
        ValueBounds::new(Some(0.0), Some(10.0)).unwrap().clamp_in_place(values.view_mut());
        assert_eq!(&values.to_vec()[..3], &[0.0, 0.5, 10.0]);
        assert!(values[3].is_nan());

        let lower_only = ValueBounds::new(Some(0.0), None).unwrap();
        assert_eq!(lower_only.clamp(-3.0), 0.0);
        assert_eq!(lower_only.clamp(12.0), 12.0);
        assert_eq!(ValueBounds::UNBOUNDED.clamp(-1e9), -1e9);
    }
}
