//! NAME / VALUE benchmark summary.

use crate::table::{Cell, RenderedTable};
use perfverdict_types::BenchmarkStatistics;

pub fn render_summary(stats: &BenchmarkStatistics, fillna: &str) -> RenderedTable {
    let text = |s: &str| Cell::Text(s.to_string());
    let count = |n: usize| Cell::Number(n as f64);

    let rows = vec![
        ("Test Result", text(stats.benchmark_result.as_str())),
        ("Total Case", count(stats.total_case_num)),
        ("Failed Case", count(stats.failed_case_num)),
        ("Failed Rate", text(&stats.failed_case_rate)),
        ("Primary Metric", text(&stats.primary_metric)),
        (
            "Overall Performance",
            stats
                .overall_performance
                .as_deref()
                .map_or_else(|| Cell::Fill(fillna.to_string()), text),
        ),
    ];

    RenderedTable {
        columns: vec!["NAME".to_string(), "VALUE".to_string()],
        rows: rows
            .into_iter()
            .map(|(name, value)| vec![text(name), value])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfverdict_types::BenchmarkResult;

    fn stats() -> BenchmarkStatistics {
        BenchmarkStatistics {
            case_num_base: Some(100),
            case_num_test: Some(100),
            total_case_num: 100,
            case_num_invalid_data: 0,
            case_num_high_variance: 0,
            case_num_no_significance: 0,
            case_num_negligible_changes: 99,
            case_num_moderate_improvement: 0,
            case_num_moderate_regression: 0,
            case_num_dramatic_improvement: 0,
            case_num_dramatic_regression: 1,
            failed_case_num: 1,
            failed_case_rate: "1.00%".into(),
            benchmark_result: BenchmarkResult::Fail,
            primary_metric: "IOPS".into(),
            overall_performance: Some("+0.69%".into()),
        }
    }

    #[test]
    fn summary_rows() {
        let csv = render_summary(&stats(), "").to_csv();
        assert_eq!(
            csv,
            "NAME,VALUE\n\
             Test Result,FAIL\n\
             Total Case,100\n\
             Failed Case,1\n\
             Failed Rate,1.00%\n\
             Primary Metric,IOPS\n\
             Overall Performance,+0.69%\n"
        );
    }

    #[test]
    fn missing_overall_performance_is_filled() {
        let mut s = stats();
        s.overall_performance = None;
        let table = render_summary(&s, "N/A");
        assert_eq!(table.rows[5][1], Cell::Fill("N/A".into()));
    }
}
