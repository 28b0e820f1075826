use super::{BASE, CONFIG, TEST_FAIL, config, table};
use perfverdict_domain::{AggregateOptions, aggregate, build_report};
use perfverdict_ingest::{parse_report, read_csv};
use perfverdict_render::{OutputFormat, render_report};
use perfverdict_types::Report;

fn rendered_and_reparsed(cfg_text: &str) -> (Report, Report) {
    let cfg = config(cfg_text);
    let report = build_report(&table("BASE", BASE), &table("TEST", TEST_FAIL), &cfg)
        .expect("report should build");
    let csv = render_report(&report, &cfg)
        .write(OutputFormat::Csv)
        .expect("csv should render");
    let reparsed = parse_report(&read_csv("REPORT", &csv).expect("csv should read"))
        .expect("report should parse");
    (report, reparsed)
}

#[test]
fn labels_survive_render_and_parse() {
    let (report, reparsed) = rendered_and_reparsed(CONFIG);

    assert_eq!(reparsed.kpi_names, report.kpi_names);
    assert_eq!(reparsed.key_names, vec!["RW", "BS(KiB)"]);
    assert_eq!(reparsed.rows.len(), report.rows.len());
    for (a, b) in report.rows.iter().zip(&reparsed.rows) {
        assert_eq!(a.conclusion, b.conclusion);
        for (ka, kb) in a.kpis.iter().zip(&b.kpis) {
            assert_eq!(ka.kpi, kb.kpi);
            assert_eq!(ka.conclusion, kb.conclusion);
        }
    }
}

#[test]
fn abbreviated_report_reparses_to_the_same_labels() {
    let abbreviated = CONFIG.replace("[defaults]", "[defaults]\nabbreviation = true\ncase_conclusion_abbr = true");
    let (report, reparsed) = rendered_and_reparsed(&abbreviated);
    for (a, b) in report.rows.iter().zip(&reparsed.rows) {
        assert_eq!(a.conclusion, b.conclusion);
    }
}

/// Aggregating the re-read report gives the one-pass statistics, minus
/// the input row counts which a rendered report no longer carries.
#[test]
fn statistics_from_reparsed_report_match() {
    let (report, reparsed) = rendered_and_reparsed(CONFIG);
    let opts = AggregateOptions::default();

    let direct = aggregate(&report, &opts).expect("aggregate direct");
    let again = aggregate(&reparsed, &opts).expect("aggregate reparsed");

    assert_eq!(direct.benchmark_result, again.benchmark_result);
    assert_eq!(direct.failed_case_rate, again.failed_case_rate);
    assert_eq!(direct.case_num_no_significance, again.case_num_no_significance);
    assert_eq!(direct.overall_performance, again.overall_performance);
}
