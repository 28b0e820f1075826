//! Fuzz target for per-KPI classification.
//!
//! Arbitrary statistics and thresholds, including NaN and infinities, must
//! never panic, and a finite %DF must always yield a conclusion.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use perfverdict_domain::{Thresholds, classify, roll_up};
use perfverdict_types::CaseStatistics;

#[derive(Arbitrary, Debug)]
struct ClassifyInput {
    base_pctsd: f64,
    test_pctsd: f64,
    pct_diff: f64,
    significance: f64,
    higher_is_better: bool,
    max_pctdev: f64,
    confidence: f64,
    negligible: f64,
    regression: f64,
}

fuzz_target!(|input: ClassifyInput| {
    let stats = CaseStatistics {
        base_mean: 1.0,
        base_pctsd: input.base_pctsd,
        test_mean: 1.0,
        test_pctsd: input.test_pctsd,
        pct_diff: input.pct_diff,
        significance: input.significance,
    };
    let thresholds = Thresholds {
        higher_is_better: input.higher_is_better,
        max_pctdev: input.max_pctdev,
        confidence: input.confidence,
        negligible: input.negligible,
        regression: input.regression,
    };

    let conclusion = classify(&stats, &thresholds);
    assert_eq!(conclusion.is_some(), !input.pct_diff.is_nan());
    assert_eq!(roll_up(conclusion), conclusion);
});
