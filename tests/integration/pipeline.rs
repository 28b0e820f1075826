use super::{BASE, CONFIG, TEST_FAIL, config, table};
use perfverdict_app::{CompareRequest, CompareUseCase};
use perfverdict_domain::{AggregateOptions, aggregate, build_report};
use perfverdict_render::{OutputFormat, render_report, render_summary};
use perfverdict_types::{BenchmarkResult, Conclusion};

#[test]
fn compare_use_case_matches_manual_pipeline() {
    let cfg = config(CONFIG);
    let base = table("BASE", BASE);
    let test = table("TEST", TEST_FAIL);

    let report = build_report(&base, &test, &cfg).expect("report should build");
    let stats = aggregate(
        &report,
        &AggregateOptions {
            primary_metrics: Vec::new(),
            unresolved_case: cfg.options.unresolved_case,
            case_num_base: Some(base.len()),
            case_num_test: Some(test.len()),
        },
    )
    .expect("aggregation should succeed");

    let outcome = CompareUseCase::execute(CompareRequest {
        base,
        test,
        config: cfg,
        primary_metrics: Vec::new(),
    })
    .expect("compare should succeed");

    assert_eq!(
        serde_json::to_value(&outcome.report.report).expect("serialize"),
        serde_json::to_value(&report).expect("serialize")
    );
    assert_eq!(outcome.statistics, stats);
    assert!(outcome.failed());
}

#[test]
fn fail_statistics_are_consistent() {
    let cfg = config(CONFIG);
    let report = build_report(&table("BASE", BASE), &table("TEST", TEST_FAIL), &cfg)
        .expect("report should build");

    let rows: Vec<_> = report.rows.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(rows, vec!["(read, 4)", "(write, 4)"]);

    let write = &report.rows[1];
    assert_eq!(write.conclusion, Some(Conclusion::DramaticRegression));
    assert_eq!(
        write.kpi("LAT").and_then(|k| k.conclusion),
        Some(Conclusion::DramaticRegression)
    );

    let stats = aggregate(&report, &AggregateOptions::default()).expect("aggregate");
    let counted: usize = Conclusion::ALL.iter().map(|c| stats.case_num(*c)).sum();
    assert_eq!(counted, stats.total_case_num);
    assert_eq!(stats.failed_case_num, stats.case_num_dramatic_regression);
    assert_eq!(stats.benchmark_result, BenchmarkResult::Fail);
    assert_eq!(stats.primary_metric, "IOPS");
    assert_eq!(stats.overall_performance.as_deref(), Some("-40.00%"));
}

#[test]
fn rendering_is_deterministic() {
    let cfg = config(CONFIG);
    let report = build_report(&table("BASE", BASE), &table("TEST", TEST_FAIL), &cfg)
        .expect("report should build");

    let first = render_report(&report, &cfg).write(OutputFormat::Csv).expect("csv");
    let second = render_report(&report, &cfg).write(OutputFormat::Csv).expect("csv");
    assert_eq!(first, second);

    let stats = aggregate(&report, &AggregateOptions::default()).expect("aggregate");
    let summary = render_summary(&stats, "NaN")
        .write(OutputFormat::Markdown)
        .expect("markdown");
    assert!(summary.contains("| Test Result | FAIL |"));
    assert!(summary.contains("| Overall Performance | -40.00% |"));
}

/// Swapping row order inside a table does not change the report.
#[test]
fn row_order_within_a_case_is_irrelevant() {
    let cfg = config(CONFIG);
    let shuffled = "\
rw,bs,iops,lat
write,4,505,2.02
read,4,990,0.99
write,4,500,2.00
read,4,1000,1.00
write,4,495,1.98
read,4,1010,1.01
";
    let a = build_report(&table("BASE", BASE), &table("TEST", TEST_FAIL), &cfg).expect("a");
    let b = build_report(&table("BASE", shuffled), &table("TEST", TEST_FAIL), &cfg).expect("b");

    for (x, y) in a.rows.iter().zip(&b.rows) {
        assert_eq!(x.key, y.key);
        assert_eq!(x.conclusion, y.conclusion);
        for (kx, ky) in x.kpis.iter().zip(&y.kpis) {
            approx::assert_relative_eq!(kx.stats.pct_diff, ky.stats.pct_diff, epsilon = 1e-9);
            assert_eq!(kx.conclusion, ky.conclusion);
        }
    }
}

#[test]
fn facade_reexports_drive_the_same_pipeline() {
    let cfg = perfverdict::config::resolve_report_config(
        &perfverdict::config::parse_config(CONFIG, perfverdict::config::ConfigFormat::Toml)
            .expect("parse"),
    )
    .expect("resolve");
    let base = perfverdict::ingest::read_csv("BASE", BASE).expect("base");
    let test = perfverdict::ingest::read_csv("TEST", TEST_FAIL).expect("test");
    let report: perfverdict::Report =
        perfverdict::domain::build_report(&base, &test, &cfg).expect("report");
    assert_eq!(report.kpi_names, vec!["IOPS", "LAT"]);
}
