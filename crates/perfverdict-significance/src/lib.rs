//! Statistical significance testing for BASE vs TEST samples.
//!
//! Significance is `1 - p` of a two-sided Student's t-test. Every failure
//! mode of the test (too few samples, missing samples, zero pooled variance
//! with equal means, mismatched pairs) surfaces as `NaN`.

use perfverdict_stats::{mean, sample_std_dev};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Which t-test to run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TestKind {
    /// Two independent samples with pooled variance.
    #[default]
    Independent,
    /// Matched samples; BASE[i] pairs with TEST[i].
    Paired,
}

/// Result of a t-test.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TTest {
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
}

/// `1 - p_value`, or `NaN` when the test is undefined.
pub fn significance(base: &[f64], test: &[f64], kind: TestKind) -> f64 {
    let result = match kind {
        TestKind::Independent => independent_t_test(base, test),
        TestKind::Paired => paired_t_test(base, test),
    };
    match result {
        Some(t) => 1.0 - t.p_value,
        None => f64::NAN,
    }
}

/// Student's two-sample t-test assuming equal variances.
pub fn independent_t_test(a: &[f64], b: &[f64]) -> Option<TTest> {
    if has_missing(a) || has_missing(b) || a.len() < 2 || b.len() < 2 {
        return None;
    }
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let df = n1 + n2 - 2.0;

    let (s1, s2) = (sample_std_dev(a), sample_std_dev(b));
    let pooled_var = ((n1 - 1.0) * s1 * s1 + (n2 - 1.0) * s2 * s2) / df;
    let se = (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();

    t_test(mean(a) - mean(b), se, df)
}

/// Paired t-test over `a[i] - b[i]`.
pub fn paired_t_test(a: &[f64], b: &[f64]) -> Option<TTest> {
    if a.len() != b.len() || has_missing(a) || has_missing(b) || a.len() < 2 {
        return None;
    }
    let diffs: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
    let n = diffs.len() as f64;
    let se = sample_std_dev(&diffs) / n.sqrt();

    t_test(mean(&diffs), se, n - 1.0)
}

fn t_test(mean_diff: f64, se: f64, df: f64) -> Option<TTest> {
    if !mean_diff.is_finite() || !se.is_finite() {
        return None;
    }

    if se == 0.0 {
        // No spread at all: equal means are indistinguishable, unequal means
        // are separated with certainty.
        if mean_diff == 0.0 {
            return None;
        }
        return Some(TTest {
            t_statistic: mean_diff.signum() * f64::INFINITY,
            degrees_of_freedom: df,
            p_value: 0.0,
        });
    }

    let t = mean_diff / se;
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    let p_value = (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0);
    if p_value.is_nan() {
        return None;
    }

    Some(TTest {
        t_statistic: t,
        degrees_of_freedom: df,
        p_value,
    })
}

fn has_missing(values: &[f64]) -> bool {
    values.iter().any(|v| !v.is_finite())
}
