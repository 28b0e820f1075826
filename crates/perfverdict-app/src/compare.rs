//! Report, statistics and summary use cases.

use anyhow::Context;
use perfverdict_domain::{AggregateOptions, aggregate, build_report, unresolved_cases};
use perfverdict_render::{RenderedTable, render_report, render_summary};
use perfverdict_types::{
    BenchmarkResult, BenchmarkStatistics, KeyTuple, Report, ReportConfig, SampleTable,
};
use tracing::{debug, info, warn};

/// Request for comparing a BASE and a TEST sample table.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub base: SampleTable,
    pub test: SampleTable,
    pub config: ReportConfig,
}

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub report: Report,
    /// The report formatted per the config's rounding, fill and unit rules.
    pub table: RenderedTable,
    /// Cases for which no KPI could be classified.
    pub unresolved: Vec<KeyTuple>,
}

pub struct ReportUseCase;

impl ReportUseCase {
    pub fn execute(req: ReportRequest) -> anyhow::Result<ReportOutcome> {
        info!(
            base_rows = req.base.len(),
            test_rows = req.test.len(),
            kpis = req.config.kpis.len(),
            "building comparison report"
        );

        let report =
            build_report(&req.base, &req.test, &req.config).context("build comparison report")?;

        for row in &report.rows {
            debug!(case = %row.key, conclusion = ?row.conclusion, "classified case");
        }

        let unresolved: Vec<KeyTuple> = unresolved_cases(&report).map(|r| r.key.clone()).collect();
        for key in &unresolved {
            if req.config.options.case_conclusion {
                warn!(case = %key, "no KPI could be classified; case reported as Invalid Data");
            } else {
                warn!(case = %key, "no KPI could be classified");
            }
        }

        let table = render_report(&report, &req.config);
        info!(cases = report.rows.len(), "comparison report built");

        Ok(ReportOutcome {
            report,
            table,
            unresolved,
        })
    }
}

/// Request for benchmark statistics over a report.
#[derive(Debug, Clone)]
pub struct StatisticsRequest {
    pub report: Report,
    pub options: AggregateOptions,
}

pub struct StatisticsUseCase;

impl StatisticsUseCase {
    pub fn execute(req: StatisticsRequest) -> anyhow::Result<BenchmarkStatistics> {
        let stats =
            aggregate(&req.report, &req.options).context("compute benchmark statistics")?;

        info!(
            total = stats.total_case_num,
            failed = stats.failed_case_num,
            result = %stats.benchmark_result,
            primary_metric = %stats.primary_metric,
            "benchmark statistics computed"
        );
        if stats.overall_performance.is_none() {
            debug!("no primary metric carries a signal; overall performance left empty");
        }

        Ok(stats)
    }
}

#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub statistics: BenchmarkStatistics,
    pub fillna: String,
}

pub struct SummaryUseCase;

impl SummaryUseCase {
    pub fn execute(req: SummaryRequest) -> RenderedTable {
        render_summary(&req.statistics, &req.fillna)
    }
}

/// Report, statistics and summary in one pass.
#[derive(Debug, Clone)]
pub struct CompareRequest {
    pub base: SampleTable,
    pub test: SampleTable,
    pub config: ReportConfig,
    /// Overrides the configured primary metrics when non-empty.
    pub primary_metrics: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CompareOutcome {
    pub report: ReportOutcome,
    pub statistics: BenchmarkStatistics,
    pub summary: RenderedTable,
}

impl CompareOutcome {
    pub fn failed(&self) -> bool {
        self.statistics.benchmark_result == BenchmarkResult::Fail
    }
}

pub struct CompareUseCase;

impl CompareUseCase {
    pub fn execute(req: CompareRequest) -> anyhow::Result<CompareOutcome> {
        let options = AggregateOptions {
            primary_metrics: if req.primary_metrics.is_empty() {
                req.config.options.primary_metrics.clone()
            } else {
                req.primary_metrics
            },
            unresolved_case: req.config.options.unresolved_case,
            case_num_base: Some(req.base.len()),
            case_num_test: Some(req.test.len()),
        };
        let fillna = req.config.options.fillna.clone();

        let report = ReportUseCase::execute(ReportRequest {
            base: req.base,
            test: req.test,
            config: req.config,
        })?;

        let statistics = StatisticsUseCase::execute(StatisticsRequest {
            report: report.report.clone(),
            options,
        })?;

        let summary = SummaryUseCase::execute(SummaryRequest {
            statistics: statistics.clone(),
            fillna,
        });

        Ok(CompareOutcome {
            report,
            statistics,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfverdict_render::Cell;
    use perfverdict_types::{
        Conclusion, KeySpec, KpiSpec, ReportOptions, UnresolvedCasePolicy, Value,
    };

    fn config() -> ReportConfig {
        let mut lat = KpiSpec::new("LAT");
        lat.from = "lat".into();
        lat.higher_is_better = false;
        let mut iops = KpiSpec::new("IOPS");
        iops.from = "iops".into();
        ReportConfig {
            keys: vec![KeySpec {
                name: "RW".into(),
                from: "rw".into(),
                unit: None,
                round: None,
            }],
            kpis: vec![iops, lat],
            options: ReportOptions {
                round: Some(2),
                round_pct: Some(2),
                ..Default::default()
            },
        }
    }

    fn table(name: &str, rows: &[(&str, f64, f64)]) -> SampleTable {
        let mut t = SampleTable::new(name, vec!["rw".into(), "iops".into(), "lat".into()]);
        for (rw, iops, lat) in rows {
            t.push_row(vec![
                Value::Text((*rw).into()),
                Value::Number(*iops),
                Value::Number(*lat),
            ])
            .unwrap();
        }
        t
    }

    fn base() -> SampleTable {
        table(
            "BASE",
            &[
                ("read", 1000.0, 1.0),
                ("read", 1010.0, 1.01),
                ("read", 990.0, 0.99),
                ("write", 500.0, 2.0),
                ("write", 505.0, 2.02),
                ("write", 495.0, 1.98),
            ],
        )
    }

    #[test]
    fn report_use_case_renders_the_report() {
        let test = table(
            "TEST",
            &[
                ("read", 1000.0, 1.0),
                ("read", 1010.0, 1.01),
                ("read", 990.0, 0.99),
                ("write", 300.0, 3.0),
                ("write", 303.0, 3.03),
                ("write", 297.0, 2.97),
            ],
        );
        let out = ReportUseCase::execute(ReportRequest {
            base: base(),
            test,
            config: config(),
        })
        .unwrap();

        assert_eq!(out.report.rows.len(), 2);
        assert!(out.unresolved.is_empty());
        assert_eq!(out.table.rows.len(), 2);
        assert_eq!(out.table.columns[1], "Conclusion");
        assert_eq!(out.table.rows[0][1], Cell::Text("No Significance".into()));
        assert_eq!(
            out.table.rows[1][1],
            Cell::Text("Dramatic Regression".into())
        );
    }

    #[test]
    fn compare_fails_on_a_dramatic_regression() {
        let test = table(
            "TEST",
            &[
                ("read", 1000.0, 1.0),
                ("read", 1010.0, 1.01),
                ("read", 990.0, 0.99),
                ("write", 300.0, 3.0),
                ("write", 303.0, 3.03),
                ("write", 297.0, 2.97),
            ],
        );
        let out = CompareUseCase::execute(CompareRequest {
            base: base(),
            test,
            config: config(),
            primary_metrics: Vec::new(),
        })
        .unwrap();

        assert!(out.failed());
        assert_eq!(out.statistics.case_num_base, Some(6));
        assert_eq!(out.statistics.total_case_num, 2);
        assert_eq!(out.statistics.failed_case_num, 1);
        assert_eq!(out.statistics.failed_case_rate, "50.00%");
        assert_eq!(out.statistics.primary_metric, "IOPS");
        assert_eq!(out.statistics.overall_performance.as_deref(), Some("-40.00%"));
        assert_eq!(out.summary.rows[0][1], Cell::Text("FAIL".into()));
    }

    #[test]
    fn explicit_primary_metrics_override_config() {
        let out = CompareUseCase::execute(CompareRequest {
            base: base(),
            test: base(),
            config: config(),
            primary_metrics: vec!["LAT".into()],
        })
        .unwrap();
        assert!(!out.failed());
        assert_eq!(out.statistics.primary_metric, "LAT");
    }

    #[test]
    fn unknown_primary_metric_is_an_error() {
        let err = CompareUseCase::execute(CompareRequest {
            base: base(),
            test: base(),
            config: config(),
            primary_metrics: vec!["BW".into()],
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("BW"));
    }

    #[test]
    fn unresolved_cases_are_surfaced() {
        let mut test = base();
        test.push_row(vec![
            Value::Text("trim".into()),
            Value::Number(1.0),
            Value::Number(1.0),
        ])
        .unwrap();
        let out = ReportUseCase::execute(ReportRequest {
            base: base(),
            test,
            config: config(),
        })
        .unwrap();
        assert_eq!(out.unresolved.len(), 1);
        assert_eq!(out.unresolved[0].to_string(), "(trim)");
        let row = out.report.rows.iter().find(|r| r.key == out.unresolved[0]);
        assert_eq!(row.and_then(|r| r.conclusion), Some(Conclusion::InvalidData));
    }

    #[test]
    fn unresolved_case_policy_error_aborts() {
        let mut cfg = config();
        cfg.options.unresolved_case = UnresolvedCasePolicy::Error;
        let err = ReportUseCase::execute(ReportRequest {
            base: base(),
            test: table("TEST", &[("trim", 1.0, 1.0)]),
            config: cfg,
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("build comparison report"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The exit verdict always agrees with the dramatic-regression count,
            /// and every case lands in exactly one category.
            #[test]
            fn verdict_matches_counts(scale in 0.1f64..3.0, jitter in 0.0f64..50.0) {
                let test = table(
                    "TEST",
                    &[
                        ("read", 1000.0 * scale, 1.0 / scale),
                        ("read", 1000.0 * scale + jitter, 1.0 / scale + 0.01),
                        ("read", 1000.0 * scale - jitter, 1.0 / scale - 0.01),
                        ("write", 500.0 * scale, 2.0),
                        ("write", 505.0 * scale, 2.02),
                        ("write", 495.0 * scale, 1.98),
                    ],
                );
                let out = CompareUseCase::execute(CompareRequest {
                    base: base(),
                    test,
                    config: config(),
                    primary_metrics: Vec::new(),
                })
                .unwrap();

                let stats = &out.statistics;
                let counted: usize = Conclusion::ALL.iter().map(|c| stats.case_num(*c)).sum();
                prop_assert_eq!(counted, stats.total_case_num);
                prop_assert_eq!(out.failed(), stats.case_num_dramatic_regression > 0);
                prop_assert_eq!(out.report.table.rows.len(), out.report.report.rows.len());
            }
        }
    }
}
