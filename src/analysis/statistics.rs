//! Summary statistics of difference values.
//!
//! Purpose
//! -------
//! Describe a set of actual − counterfactual differences: location, spread,
//! range, quartiles, and the split between positive, negative, and zero
//! differences.
//!
//! Conventions
//! -----------
//! - `NaN` inputs are dropped before anything is computed.
//! - `std` is the sample standard deviation (`n − 1` denominator) and is
//!   `NaN` for a single value.
//! - Quartiles interpolate linearly between order statistics: the `q`
//!   quantile of sorted `x[0..n)` sits at position `(n − 1)·q`.
use statrs::statistics::{Data, Median, Statistics};

/// SummaryStatistics — description of a non-empty set of differences.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
    pub num_positive: usize,
    pub num_negative: usize,
    pub num_zero: usize,
}

impl SummaryStatistics {
    /// Statistics of the non-missing `values`; `None` if there are none.
    pub fn compute(values: &[f64]) -> Option<SummaryStatistics> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().mean();
        let std = sorted.iter().std_dev();
        let median = Data::new(sorted.clone()).median();

        Some(SummaryStatistics {
            count,
            mean,
            median,
            std,
            min: sorted[0],
            max: sorted[count - 1],
            q25: interpolated_quantile(&sorted, 0.25),
            q75: interpolated_quantile(&sorted, 0.75),
            num_positive: sorted.iter().filter(|v| **v > 0.0).count(),
            num_negative: sorted.iter().filter(|v| **v < 0.0).count(),
            num_zero: sorted.iter().filter(|v| **v == 0.0).count(),
        })
    }

    pub fn pct_positive(&self) -> f64 {
        percent(self.num_positive, self.count)
    }

    pub fn pct_negative(&self) -> f64 {
        percent(self.num_negative, self.count)
    }

    pub fn pct_zero(&self) -> f64 {
        percent(self.num_zero, self.count)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}

// `sorted` is non-empty and ascending.
fn interpolated_quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
}
