//! Benchmark-level statistics over all cases of a report.

use crate::rollup::roll_up_case;
use perfverdict_error::{AggregationError, ConfigError, Result};
use perfverdict_types::{
    BenchmarkResult, BenchmarkStatistics, Conclusion, Report, UnresolvedCasePolicy,
};

#[derive(Debug, Clone, Default)]
pub struct AggregateOptions {
    /// KPIs whose %DF feeds the overall performance; inferred when empty.
    pub primary_metrics: Vec<String>,
    pub unresolved_case: UnresolvedCasePolicy,
    /// Row count of the BASE input, when known.
    pub case_num_base: Option<usize>,
    /// Row count of the TEST input, when known.
    pub case_num_test: Option<usize>,
}

/// Count cases by conclusion and decide PASS/FAIL.
///
/// Case conclusions are taken from the report when present and rolled up
/// from the per-KPI conclusions otherwise.
pub fn aggregate(report: &Report, opts: &AggregateOptions) -> Result<BenchmarkStatistics> {
    let total = report.rows.len();
    if total == 0 {
        return Err(AggregationError::NoCases.into());
    }

    let primary = if opts.primary_metrics.is_empty() {
        infer_primary_metrics(&report.kpi_names)
    } else {
        for m in &opts.primary_metrics {
            if !report.kpi_names.contains(m) {
                return Err(ConfigError::UnknownPrimaryMetric(m.clone()).into());
            }
        }
        opts.primary_metrics.clone()
    };

    let mut counts = [0usize; 8];
    let mut signal = Vec::new();

    for row in &report.rows {
        let conclusion = match row.conclusion {
            Some(c) => c,
            None => {
                let per_kpi: Vec<_> = row.kpis.iter().map(|k| k.conclusion).collect();
                roll_up_case(&row.key, &per_kpi, opts.unresolved_case)?
            }
        };
        counts[conclusion_index(conclusion)] += 1;

        for kpi in row.kpis.iter().filter(|k| primary.contains(&k.kpi)) {
            let carries = kpi.conclusion.is_some_and(Conclusion::carries_signal);
            if carries && kpi.stats.pct_diff.is_finite() {
                signal.push(kpi.stats.pct_diff);
            }
        }
    }

    let count = |c: Conclusion| counts[conclusion_index(c)];
    let failed = count(Conclusion::DramaticRegression);

    let overall_performance = if signal.is_empty() {
        None
    } else {
        Some(format_signed_pct(
            signal.iter().sum::<f64>() / signal.len() as f64,
        ))
    };

    Ok(BenchmarkStatistics {
        case_num_base: opts.case_num_base,
        case_num_test: opts.case_num_test,
        total_case_num: total,
        case_num_invalid_data: count(Conclusion::InvalidData),
        case_num_high_variance: count(Conclusion::HighVariance),
        case_num_no_significance: count(Conclusion::NoSignificance),
        case_num_negligible_changes: count(Conclusion::NegligibleChanges),
        case_num_moderate_improvement: count(Conclusion::ModerateImprovement),
        case_num_moderate_regression: count(Conclusion::ModerateRegression),
        case_num_dramatic_improvement: count(Conclusion::DramaticImprovement),
        case_num_dramatic_regression: failed,
        failed_case_num: failed,
        failed_case_rate: format!("{:.2}%", failed as f64 / total as f64 * 100.0),
        benchmark_result: if failed > 0 {
            BenchmarkResult::Fail
        } else {
            BenchmarkResult::Pass
        },
        primary_metric: primary.join(","),
        overall_performance,
    })
}

fn conclusion_index(c: Conclusion) -> usize {
    Conclusion::ALL
        .iter()
        .position(|x| *x == c)
        .unwrap_or_default()
}

/// Pick representative KPIs when none are configured.
///
/// `IOPS` wins when present; otherwise whichever of `Throughput` and
/// `Trans` the report has.
pub fn infer_primary_metrics(kpi_names: &[String]) -> Vec<String> {
    if kpi_names.iter().any(|k| k == "IOPS") {
        return vec!["IOPS".to_string()];
    }
    kpi_names
        .iter()
        .filter(|k| *k == "Throughput" || *k == "Trans")
        .cloned()
        .collect()
}

/// `+12.35%` / `-3.10%`, rounded to two decimals.
pub fn format_signed_pct(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    // -0.00 would read as a regression
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:+.2}%")
}
