//! Out-of-sample AR(p) recursion with per-step additive adjustments.
//!
//! Purpose
//! -------
//! Roll an AR(p) recursion forward from a seed window, optionally layering a
//! per-step adjustment (the seasonal pattern) and per-step Gaussian noise
//! into the path. This is the single recursion shared by
//! `AutoregressiveModel::forecast` and the counterfactual generator.
//!
//! Key behaviors
//! -------------
//! - Each step computes `c + Σ_j phi[j] · lag[j]` over the last `p` values of
//!   the rolling state (seed followed by already-forecast values).
//! - The adjustment for step `i` is added before the value enters the state,
//!   so seasonal deviations propagate through the lags.
//! - When a [`NoiseSource`] is supplied, one draw per step is added before
//!   the value enters the state as well.
//!
//! Invariants & assumptions
//! ------------------------
//! - `seed.len() >= phi.len()`; otherwise
//!   [`CounterfactualError::InsufficientSeed`] is returned.
//! - `phi` and the lag window are both ordered oldest → newest, so
//!   `phi[p - 1]` weights the most recent value.
//! - The horizon is `adjustments.len()`.
//!
//! Conventions
//! -----------
//! - `out[i]` is the `(i + 1)`-step-ahead value.
//! - The lag window is never materialized: for step `i` the dot product is
//!   split between the seed tail and the already-forecast tail of `out`.
use ndarray::{Array1, ArrayView1, s};

use crate::counterfactual::{
    core::noise::NoiseSource,
    errors::{CFResult, CounterfactualError},
};

/// Roll the recursion forward with a per-step additive adjustment.
///
/// Parameters
/// ----------
/// - `seed`: last observed values, oldest → newest. Only the final
///   `phi.len()` entries are used.
/// - `c`: intercept.
/// - `phi`: AR coefficients, oldest lag first.
/// - `adjustments`: additive term for each step; its length is the horizon.
/// - `noise`: optional Gaussian source; one draw per step enters the state.
///
/// # Errors
/// Returns [`CounterfactualError::InsufficientSeed`] if
/// `seed.len() < phi.len()`.
///
/// Examples
/// --------
/// ```rust
/// use ndarray::array;
/// use counterfactual_ts::counterfactual::core::forecasts::forecast_with_adjustments;
///
/// // y_t = 1.0 + 0.5 · y_{t-1} + adj_t
/// let path = forecast_with_adjustments(
///     array![2.0].view(),
///     1.0,
///     array![0.5].view(),
///     array![0.0, 1.0, 0.0].view(),
///     None,
/// )?;
/// assert_eq!(path.to_vec(), vec![2.0, 3.0, 2.5]);
/// # Ok::<(), counterfactual_ts::counterfactual::errors::CounterfactualError>(())
/// ```
pub fn forecast_with_adjustments(
    seed: ArrayView1<f64>, c: f64, phi: ArrayView1<f64>, adjustments: ArrayView1<f64>,
    noise: Option<&mut NoiseSource>,
) -> CFResult<Array1<f64>> {
    let p = phi.len();
    let n_seed = seed.len();
    if n_seed < p {
        return Err(CounterfactualError::InsufficientSeed { required: p, actual: n_seed });
    }

    let mut noise = noise;
    let horizon = adjustments.len();
    let mut out = Array1::<f64>::zeros(horizon);
    for i in 0..horizon {
        let k_seed = p.saturating_sub(i);
        let k_out = p - k_seed;
        let seed_tail = seed.slice(s![n_seed - k_seed..]);
        let out_tail = out.slice(s![i - k_out..i]);
        let ar = c + phi.slice(s![..k_seed]).dot(&seed_tail) + phi.slice(s![k_seed..]).dot(&out_tail);
        let shock = noise.as_deref_mut().map_or(0.0, NoiseSource::draw);
        out[i] = ar + adjustments[i] + shock;
    }
    Ok(out)
}

/// Plain AR(p) projection: [`forecast_with_adjustments`] with zero adjustments.
///
/// # Errors
/// Returns [`CounterfactualError::InsufficientSeed`] if
/// `seed.len() < phi.len()`.
///
/// Examples
/// --------
/// ```rust
/// use ndarray::array;
/// use counterfactual_ts::counterfactual::core::forecasts::forecast;
///
/// // y_t = 0.5 + y_{t-1}; the older lag has weight 0.
/// let path = forecast(array![1.0, 2.0].view(), 3, 0.5, array![0.0, 1.0].view(), None)?;
/// assert_eq!(path.to_vec(), vec![2.5, 3.0, 3.5]);
/// # Ok::<(), counterfactual_ts::counterfactual::errors::CounterfactualError>(())
/// ```
pub fn forecast(
    seed: ArrayView1<f64>, horizon: usize, c: f64, phi: ArrayView1<f64>,
    noise: Option<&mut NoiseSource>,
) -> CFResult<Array1<f64>> {
    let zeros = Array1::<f64>::zeros(horizon);
    forecast_with_adjustments(seed, c, phi, zeros.view(), noise)
}
