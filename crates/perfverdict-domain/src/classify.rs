//! The per-KPI decision procedure.

use perfverdict_error::ConfigError;
use perfverdict_types::{CaseStatistics, Conclusion, KpiSpec};
use perfverdict_validation::{validate_non_negative, validate_unit_interval};

/// A KPI's thresholds, validated and scaled to percent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Thresholds {
    pub higher_is_better: bool,
    /// Percent; 0 disables the high-variance rule.
    pub max_pctdev: f64,
    pub confidence: f64,
    /// Percent.
    pub negligible: f64,
    /// Percent.
    pub regression: f64,
}

impl Thresholds {
    pub fn from_spec(kpi: &KpiSpec) -> Result<Self, ConfigError> {
        let name = kpi.name.as_str();
        Ok(Self {
            higher_is_better: kpi.higher_is_better,
            max_pctdev: validate_non_negative(
                name,
                "max_pctdev_threshold",
                kpi.max_pctdev_threshold,
            )? * 100.0,
            confidence: validate_unit_interval(
                name,
                "confidence_threshold",
                kpi.confidence_threshold,
            )?,
            negligible: validate_non_negative(
                name,
                "negligible_threshold",
                kpi.negligible_threshold,
            )? * 100.0,
            regression: validate_non_negative(
                name,
                "regression_threshold",
                kpi.regression_threshold,
            )? * 100.0,
        })
    }
}

/// Classify one (case, KPI) pair.
///
/// Rules are evaluated in order and the first match wins. `None` means the
/// pair is not applicable (no %DF) and takes no part in any count.
pub fn classify(stats: &CaseStatistics, t: &Thresholds) -> Option<Conclusion> {
    let CaseStatistics {
        base_pctsd,
        test_pctsd,
        pct_diff,
        significance,
        ..
    } = *stats;

    if pct_diff.is_nan() {
        return None;
    }

    if significance.is_nan()
        || !(0.0..=1.0).contains(&significance)
        || base_pctsd < 0.0
        || test_pctsd < 0.0
    {
        return Some(Conclusion::InvalidData);
    }

    // f64::max ignores a NaN operand, so an undefined %SD on one side
    // leaves the other side to decide.
    if t.max_pctdev != 0.0 && base_pctsd.max(test_pctsd) > t.max_pctdev {
        return Some(Conclusion::HighVariance);
    }

    if significance < t.confidence {
        return Some(Conclusion::NoSignificance);
    }

    let magnitude = pct_diff.abs();
    if magnitude <= t.negligible {
        return Some(Conclusion::NegligibleChanges);
    }

    let improved = (t.higher_is_better && pct_diff > 0.0) || (!t.higher_is_better && pct_diff < 0.0);
    let dramatic = magnitude > t.regression;

    Some(match (dramatic, improved) {
        (true, true) => Conclusion::DramaticImprovement,
        (true, false) => Conclusion::DramaticRegression,
        (false, true) => Conclusion::ModerateImprovement,
        (false, false) => Conclusion::ModerateRegression,
    })
}
