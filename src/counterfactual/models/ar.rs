//! AR(p) model — ordinary-least-squares fit with an explicit degenerate
//! variant, plus recursive projection.
//!
//! Purpose
//! -------
//! Fit `y_t = c + Σ_{j=1..p} phi_j · y_{t−p−1+j} + ε_t` on a window of
//! observations and project it forward. The fit never fails on numerically
//! awkward data: constant histories, non-finite values, and magnitudes that
//! overflow the solve all produce [`ArFit::Degenerate`], which forecasts a
//! flat mean.
//!
//! Key behaviors
//! -------------
//! - [`AutoregressiveModel::fit`] builds the `(n − p) × (p + 1)` design
//!   (intercept column plus `p` lag columns) in a `nalgebra::DMatrix` and
//!   solves it with an SVD, which yields the minimum-norm solution for
//!   rank-deficient designs.
//! - Small singular values are truncated at `σ_max · ε · max(rows, cols)`.
//! - [`ArFit::params`] materializes [`ArParams`] for either variant; the
//!   degenerate variant has zero `phi`, `c = mean`, and no residual spread.
//!
//! Invariants & assumptions
//! ------------------------
//! - `order >= 1`, enforced at construction.
//! - Missing values are dropped by the caller before fitting. Any NaN or
//!   ±∞ that still reaches `fit` yields a degenerate fit.
//! - `phi` is ordered oldest lag first: `phi[0]` multiplies `y_{t−p}` and
//!   `phi[p−1]` multiplies `y_{t−1}`.
//!
//! Conventions
//! -----------
//! - `residual_std` is the population standard deviation (divisor `n`).
//! - Degenerate fallbacks are logged at `debug` level and never returned as
//!   errors.
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1, s};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::counterfactual::{
    core::{
        forecasts::forecast,
        noise::NoiseSource,
        validation::{validate_ar_order, validate_history_len},
    },
    errors::CFResult,
};

/// Population std below which the lagged history counts as constant.
pub const CONSTANT_HISTORY_TOL: f64 = 1e-10;

/// Why a fit fell back to a flat mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateReason {
    /// The lagged history has (numerically) zero spread.
    ConstantHistory,
    /// The history contains NaN or ±∞.
    NonFiniteHistory,
    /// The least-squares problem has no finite `f64` solution: its
    /// magnitudes overflow, or the solve produced NaN or ±∞.
    NonFiniteCoefficients,
}

/// ArParams — fitted AR(p) parameters.
///
/// Fields
/// ------
/// - `order`: `p`.
/// - `phi`: length-`p` coefficients, oldest lag first.
/// - `c`: intercept.
/// - `residual_std`: population std of `residuals` (0 when there are none).
/// - `residuals`: in-sample `actual − fitted`, length `n − p`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArParams {
    pub order: usize,
    pub phi: Array1<f64>,
    pub c: f64,
    pub residual_std: f64,
    pub residuals: Array1<f64>,
}

impl ArParams {
    /// Project `horizon` steps ahead from `seed` (oldest → newest).
    ///
    /// # Errors
    /// Returns `CounterfactualError::InsufficientSeed` if `seed.len() < order`.
    pub fn forecast(
        &self, seed: ArrayView1<f64>, horizon: usize, noise: Option<&mut NoiseSource>,
    ) -> CFResult<Array1<f64>> {
        forecast(seed, horizon, self.c, self.phi.view(), noise)
    }
}

/// ArFit — result of fitting an AR(p) model.
#[derive(Debug, Clone, PartialEq)]
pub enum ArFit {
    Fitted(ArParams),
    Degenerate { order: usize, mean: f64, n_targets: usize, reason: DegenerateReason },
}

impl ArFit {
    pub fn order(&self) -> usize {
        match self {
            ArFit::Fitted(params) => params.order,
            ArFit::Degenerate { order, .. } => *order,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, ArFit::Degenerate { .. })
    }

    pub fn degenerate_reason(&self) -> Option<DegenerateReason> {
        match self {
            ArFit::Fitted(_) => None,
            ArFit::Degenerate { reason, .. } => Some(*reason),
        }
    }

    pub fn residual_std(&self) -> f64 {
        match self {
            ArFit::Fitted(params) => params.residual_std,
            ArFit::Degenerate { .. } => 0.0,
        }
    }

    /// Parameters usable for projection; the degenerate case forecasts its mean.
    pub fn params(&self) -> ArParams {
        match self {
            ArFit::Fitted(params) => params.clone(),
            ArFit::Degenerate { order, mean, n_targets, .. } => ArParams {
                order: *order,
                phi: Array1::zeros(*order),
                c: *mean,
                residual_std: 0.0,
                residuals: Array1::zeros(*n_targets),
            },
        }
    }
}

/// AutoregressiveModel — AR(p) fitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoregressiveModel {
    order: usize,
}

impl AutoregressiveModel {
    /// # Errors
    /// Returns `CounterfactualError::InvalidOption` for `order == 0`.
    pub fn new(order: usize) -> CFResult<Self> {
        Ok(AutoregressiveModel { order: validate_ar_order(order)? })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Fit the model by least squares.
    ///
    /// Parameters
    /// ----------
    /// - `values`: observations ordered oldest → newest, no missing values.
    ///
    /// Returns
    /// -------
    /// `CFResult<ArFit>`
    ///   - `Ok(ArFit::Fitted)` for a well-posed design with finite solution.
    ///   - `Ok(ArFit::Degenerate)` for constant histories, NaN/±∞ inputs,
    ///     overflowing magnitudes, or non-finite coefficients. The mean is
    ///     taken over the finite targets.
    ///
    /// # Errors
    /// Returns `CounterfactualError::InsufficientHistory` if
    /// `values.len() < order + 1`.
    pub fn fit(&self, values: ArrayView1<f64>) -> CFResult<ArFit> {
        let p = self.order;
        let n = values.len();
        validate_history_len(p + 1, n)?;

        let rows = n - p;
        let targets = values.slice(s![p..]);
        let degenerate = |reason: DegenerateReason| {
            let mean = finite_mean(targets).or_else(|| finite_mean(values)).unwrap_or(0.0);
            debug!(order = p, n_obs = n, mean, ?reason, "AR fit degenerate; using flat mean");
            ArFit::Degenerate { order: p, mean, n_targets: rows, reason }
        };

        if values.iter().any(|v| !v.is_finite()) {
            return Ok(degenerate(DegenerateReason::NonFiniteHistory));
        }
        let lag_std = values.slice(s![..rows]).iter().population_std_dev();
        if lag_std < CONSTANT_HISTORY_TOL {
            return Ok(degenerate(DegenerateReason::ConstantHistory));
        }
        // The SVD panics on NaN singular values, so overflowing inputs stop here.
        let energy: f64 = values.iter().map(|v| v * v).sum();
        if !(energy * (p + 1) as f64).is_finite() {
            return Ok(degenerate(DegenerateReason::NonFiniteCoefficients));
        }

        let x = design_matrix(values, p);
        let y = DVector::from_iterator(rows, targets.iter().copied());

        let svd = x.clone().svd(true, true);
        let cutoff = svd.singular_values.max() * f64::EPSILON * rows.max(p + 1) as f64;
        let solution = svd.solve(&y, cutoff).ok().filter(|b| b.iter().all(|v| v.is_finite()));
        let Some(coeffs) = solution else {
            return Ok(degenerate(DegenerateReason::NonFiniteCoefficients));
        };

        let fitted = &x * &coeffs;
        let residuals: Array1<f64> = (&y - &fitted).iter().copied().collect();
        let residual_std =
            if residuals.is_empty() { 0.0 } else { residuals.iter().population_std_dev() };
        let c = coeffs[0];
        let phi: Array1<f64> = coeffs.iter().skip(1).copied().collect();

        debug!(order = p, n_obs = n, c, residual_std, "AR fit");
        Ok(ArFit::Fitted(ArParams { order: p, phi, c, residual_std, residuals }))
    }

    /// Project `horizon` steps ahead with explicit parameters.
    ///
    /// # Errors
    /// Returns `CounterfactualError::InsufficientSeed` if
    /// `seed.len() < phi.len()`.
    pub fn forecast(
        seed: ArrayView1<f64>, horizon: usize, c: f64, phi: ArrayView1<f64>,
        noise: Option<&mut NoiseSource>,
    ) -> CFResult<Array1<f64>> {
        forecast(seed, horizon, c, phi, noise)
    }
}

/// Mean of the finite entries; `None` if there are none.
fn finite_mean(values: ArrayView1<f64>) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() { None } else { Some(finite.mean()) }
}

/// Build the `(n − p) × (p + 1)` design: ones, then lag columns oldest first.
///
/// Column `1 + i` holds `values[i .. n − p + i]`.
fn design_matrix(values: ArrayView1<f64>, p: usize) -> DMatrix<f64> {
    let rows = values.len() - p;
    DMatrix::from_fn(rows, p + 1, |r, col| if col == 0 { 1.0 } else { values[r + col - 1] })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counterfactual::errors::CounterfactualError;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction and history-length validation.
    // - Exact recovery of noise-free AR(1) and AR(2) coefficients, with the
    //   oldest-lag-first orientation of `phi`.
    // - The degenerate fallbacks (constant, non-finite, overflowing histories)
    //   and `ArFit::params` materialization.
    // - Residual bookkeeping and forecasting from fitted parameters.
    //
    // They intentionally DO NOT cover:
    // - Seasonal adjustments or noise (see `core::forecasts` and the
    //   generator).
    // -------------------------------------------------------------------------

    fn simulate(c: f64, phi: &[f64], init: &[f64], n: usize) -> Array1<f64> {
        let p = phi.len();
        let mut y = init.to_vec();
        while y.len() < n {
            let t = y.len();
            let next = c + phi.iter().enumerate().map(|(j, w)| w * y[t - p + j]).sum::<f64>();
            y.push(next);
        }
        Array1::from(y)
    }

    #[test]
    fn new_rejects_zero_order() {
        assert!(matches!(
            AutoregressiveModel::new(0),
            Err(CounterfactualError::InvalidOption { name: "ar_order", .. })
        ));
    }

    #[test]
    fn fit_requires_order_plus_one_values() {
        let model = AutoregressiveModel::new(2).unwrap();
        assert_eq!(
            model.fit(array![1.0, 2.0].view()),
            Err(CounterfactualError::InsufficientHistory { required: 3, actual: 2 })
        );
    }

    #[test]
    // Purpose
    // -------
    // A noise-free AR(1) is recovered exactly.
    //
    // Given
    // -----
    // - y_t = 2 + 0.5·y_{t−1}, y_0 = 10, 20 points.
    //
    // Expect
    // ------
    // - c ≈ 2, phi ≈ [0.5], residual_std ≈ 0, 19 residuals.
    fn fit_recovers_noise_free_ar1() {
        let y = simulate(2.0, &[0.5], &[10.0], 20);

        let fit = AutoregressiveModel::new(1).unwrap().fit(y.view()).unwrap();
        let params = match &fit {
            ArFit::Fitted(params) => params,
            other => panic!("expected Fitted, got {other:?}"),
        };

        assert_relative_eq!(params.c, 2.0, epsilon = 1e-8);
        assert_relative_eq!(params.phi[0], 0.5, epsilon = 1e-8);
        assert!(params.residual_std < 1e-8);
        assert_eq!(params.residuals.len(), 19);
    }

    #[test]
    // Purpose
    // -------
    // `phi` comes back oldest lag first.
    //
    // Given
    // -----
    // - y_t = 1 + 0.2·y_{t−2} + 0.5·y_{t−1}, y_0 = 10, y_1 = −5, 16 points.
    //
    // Expect
    // ------
    // - phi ≈ [0.2, 0.5], c ≈ 1.
    fn fit_recovers_ar2_with_oldest_first_orientation() {
        let y = simulate(1.0, &[0.2, 0.5], &[10.0, -5.0], 16);

        let params = AutoregressiveModel::new(2).unwrap().fit(y.view()).unwrap().params();

        assert_relative_eq!(params.c, 1.0, epsilon = 1e-6);
        assert_relative_eq!(params.phi[0], 0.2, epsilon = 1e-6);
        assert_relative_eq!(params.phi[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A constant history degenerates to a flat mean instead of failing.
    //
    // Given
    // -----
    // - 240 values all equal to 75, order 2.
    //
    // Expect
    // ------
    // - `Degenerate { ConstantHistory }`, params phi = [0, 0], c = 75,
    //   residual_std = 0, 238 zero residuals.
    fn fit_constant_history_is_degenerate() {
        let y = Array1::from_elem(240, 75.0);

        let fit = AutoregressiveModel::new(2).unwrap().fit(y.view()).unwrap();

        assert_eq!(fit.degenerate_reason(), Some(DegenerateReason::ConstantHistory));
        assert_eq!(fit.residual_std(), 0.0);
        let params = fit.params();
        assert_eq!(params.phi, array![0.0, 0.0]);
        assert_eq!(params.c, 75.0);
        assert_eq!(params.residual_std, 0.0);
        assert_eq!(params.residuals.len(), 238);
        assert!(params.residuals.iter().all(|r| *r == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // The degeneracy check looks only at the lagged part of the window; a
    // change in the last `p` values still yields their mean.
    fn constant_lags_use_mean_of_targets() {
        let y = array![5.0, 5.0, 5.0, 9.0];
        let fit = AutoregressiveModel::new(1).unwrap().fit(y.view()).unwrap();
        match fit {
            ArFit::Degenerate { mean, n_targets, reason, .. } => {
                assert_eq!(reason, DegenerateReason::ConstantHistory);
                assert_eq!(n_targets, 3);
                assert_relative_eq!(mean, 19.0 / 3.0, epsilon = 1e-12);
            }
            other => panic!("expected Degenerate, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // An infinite value in the history degenerates instead of reaching the
    // SVD.
    //
    // Given
    // -----
    // - [1, 2, +∞, 3, 5] fitted with AR(1).
    //
    // Expect
    // ------
    // - `Degenerate { NonFiniteHistory }` whose mean covers the finite
    //   targets only: (2 + 3 + 5) / 3.
    fn infinite_history_is_degenerate() {
        let y = array![1.0, 2.0, f64::INFINITY, 3.0, 5.0];

        let fit = AutoregressiveModel::new(1).unwrap().fit(y.view()).unwrap();

        assert_eq!(fit.degenerate_reason(), Some(DegenerateReason::NonFiniteHistory));
        let params = fit.params();
        assert_relative_eq!(params.c, 10.0 / 3.0, epsilon = 1e-12);
        assert!(params.phi.iter().all(|v| *v == 0.0));
        assert!(params.residuals.iter().all(|r| r.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // Finite values whose squares overflow `f64` degenerate instead of
    // producing NaN singular values.
    //
    // Given
    // -----
    // - Five values around 1e160, AR(1).
    //
    // Expect
    // ------
    // - `Degenerate { NonFiniteCoefficients }` with a finite mean.
    fn overflowing_magnitudes_are_degenerate() {
        let y = array![1e160, 2e160, 1.5e160, 3e160, 2.5e160];

        let fit = AutoregressiveModel::new(1).unwrap().fit(y.view()).unwrap();

        assert_eq!(fit.degenerate_reason(), Some(DegenerateReason::NonFiniteCoefficients));
        let c = fit.params().c;
        assert!(c.is_finite());
        assert_relative_eq!(c, 2.25e160, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Residuals are actual − fitted and their population std is reported.
    //
    // Given
    // -----
    // - A short non-constant series fitted with AR(1).
    //
    // Expect
    // ------
    // - residuals sum to ≈ 0 (intercept in the design).
    // - residual_std equals the population std of the residuals.
    fn residual_std_is_population_std() {
        let y = array![1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 5.5, 7.0];

        let params = AutoregressiveModel::new(1).unwrap().fit(y.view()).unwrap().params();

        let n = params.residuals.len() as f64;
        let mean = params.residuals.sum() / n;
        let var = params.residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-9);
        assert_relative_eq!(params.residual_std, var.sqrt(), epsilon = 1e-12);
        assert!(params.residual_std > 0.0);
    }

    #[test]
    fn fitted_params_forecast_continue_the_recursion() {
        let y = simulate(2.0, &[0.5], &[10.0], 20);
        let params = AutoregressiveModel::new(1).unwrap().fit(y.view()).unwrap().params();

        let path = params.forecast(y.slice(s![-1..]), 3, None).unwrap();
        let expected = simulate(2.0, &[0.5], &[y[19]], 4);

        for (got, want) in path.iter().zip(expected.iter().skip(1)) {
            assert_relative_eq!(*got, *want, epsilon = 1e-8);
        }
    }

    #[test]
    fn design_matrix_layout() {
        let x = design_matrix(array![1.0, 2.0, 3.0, 4.0, 5.0].view(), 2);
        assert_eq!((x.nrows(), x.ncols()), (3, 3));
        assert_eq!(x.column(0).iter().copied().collect::<Vec<_>>(), vec![1.0, 1.0, 1.0]);
        assert_eq!(x.column(1).iter().copied().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert_eq!(x.column(2).iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
    }
}
