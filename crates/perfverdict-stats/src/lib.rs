//! Descriptive statistics for BASE/TEST sample vectors.
//!
//! Every function is total: indeterminate results are `NaN`, never a panic
//! or an error. Missing samples are represented as `NaN` and skipped by the
//! mean and standard deviation.

use serde::Serialize;

/// Arithmetic mean of the non-`NaN` values; `NaN` when there are none.
pub fn mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values.iter().filter(|v| !v.is_nan()) {
        sum += v;
        n += 1;
    }
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Sample standard deviation with Bessel's correction; `NaN` below two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if present.len() < 2 {
        return f64::NAN;
    }
    let m = mean(&present);
    let ss: f64 = present.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (present.len() - 1) as f64).sqrt()
}

/// Coefficient of variation in percent; `NaN` when the mean is zero.
pub fn pct_std_dev(values: &[f64]) -> f64 {
    pct_of_mean(sample_std_dev(values), mean(values))
}

/// `(test - base) / base * 100`; `NaN` when `base` is zero.
pub fn pct_diff(base_mean: f64, test_mean: f64) -> f64 {
    if base_mean == 0.0 {
        return f64::NAN;
    }
    (test_mean - base_mean) / base_mean * 100.0
}

fn pct_of_mean(sd: f64, mean: f64) -> f64 {
    if mean == 0.0 {
        return f64::NAN;
    }
    sd / mean * 100.0
}

/// Mean, %SD and %DF of one KPI over one case's BASE and TEST subsets.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct Descriptive {
    pub base_mean: f64,
    pub base_pctsd: f64,
    pub test_mean: f64,
    pub test_pctsd: f64,
    pub pct_diff: f64,
}

pub fn describe(base: &[f64], test: &[f64]) -> Descriptive {
    let base_mean = mean(base);
    let test_mean = mean(test);
    Descriptive {
        base_mean,
        base_pctsd: pct_of_mean(sample_std_dev(base), base_mean),
        test_mean,
        test_pctsd: pct_of_mean(sample_std_dev(test), test_mean),
        pct_diff: pct_diff(base_mean, test_mean),
    }
}
