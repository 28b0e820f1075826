//! Join BASE and TEST by case key and classify every (case, KPI) pair.

use crate::classify::{Thresholds, classify};
use crate::rollup::roll_up_case;
use perfverdict_error::{Result, StructuralError};
use perfverdict_significance::{TestKind, significance};
use perfverdict_stats::describe;
use perfverdict_types::{
    CaseStatistics, KeyTuple, KpiOutcome, REPORT_SCHEMA_V1, Report, ReportConfig, ReportItems,
    ReportRow, SampleTable, Value,
};
use std::collections::{BTreeMap, BTreeSet};

/// A sample table reduced to case keys and KPI vectors.
///
/// Column lookups happen once here; everything afterwards works on indices.
#[derive(Debug)]
struct CaseSamples {
    /// Row indices per case, in input order.
    cases: BTreeMap<KeyTuple, Vec<usize>>,
    /// `kpis[k][row]`; missing cells are `NaN`.
    kpis: Vec<Vec<f64>>,
}

impl CaseSamples {
    fn collect(table: &SampleTable, config: &ReportConfig) -> Result<Self> {
        let key_idx = config
            .keys
            .iter()
            .map(|k| table.require_column(&k.from))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let kpi_idx = config
            .kpis
            .iter()
            .map(|k| table.require_column(&k.from))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut cases: BTreeMap<KeyTuple, Vec<usize>> = BTreeMap::new();
        let mut kpis = vec![Vec::with_capacity(table.len()); kpi_idx.len()];

        for (r, row) in table.rows().iter().enumerate() {
            let key = KeyTuple(key_idx.iter().map(|&i| row[i].clone()).collect());
            cases.entry(key).or_default().push(r);

            for (k, &i) in kpi_idx.iter().enumerate() {
                let v = match &row[i] {
                    Value::Number(v) => *v,
                    Value::Missing => f64::NAN,
                    Value::Text(s) => {
                        return Err(StructuralError::NonNumericKpi {
                            table: table.name().to_string(),
                            column: table.columns()[i].clone(),
                            row: r,
                            value: s.clone(),
                        }
                        .into());
                    }
                };
                kpis[k].push(v);
            }
        }

        Ok(Self { cases, kpis })
    }

    fn samples(&self, key: &KeyTuple, kpi: usize) -> Vec<f64> {
        self.cases
            .get(key)
            .map(|rows| rows.iter().map(|&r| self.kpis[kpi][r]).collect())
            .unwrap_or_default()
    }
}

/// Build the comparison report for two sample tables.
///
/// Rows are sorted by case key. Each case's result depends only on its own
/// rows, so the output does not depend on input row order beyond the order
/// of samples within a case (which only matters to the paired test).
pub fn build_report(base: &SampleTable, test: &SampleTable, config: &ReportConfig) -> Result<Report> {
    let thresholds = config
        .kpis
        .iter()
        .map(Thresholds::from_spec)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let base_samples = CaseSamples::collect(base, config)?;
    let test_samples = CaseSamples::collect(test, config)?;

    let cases: BTreeSet<&KeyTuple> = match config.options.report_items {
        ReportItems::Combined => base_samples
            .cases
            .keys()
            .chain(test_samples.cases.keys())
            .collect(),
        ReportItems::TestOnly => test_samples.cases.keys().collect(),
    };

    let kind = if config.options.paired {
        TestKind::Paired
    } else {
        TestKind::Independent
    };

    let mut rows = Vec::with_capacity(cases.len());
    for key in cases {
        let mut kpis = Vec::with_capacity(config.kpis.len());
        for (k, spec) in config.kpis.iter().enumerate() {
            let b = base_samples.samples(key, k);
            let t = test_samples.samples(key, k);
            let stats = case_statistics(&b, &t, kind);
            kpis.push(KpiOutcome {
                kpi: spec.name.clone(),
                stats,
                conclusion: classify(&stats, &thresholds[k]),
            });
        }

        let conclusion = if config.options.case_conclusion {
            let per_kpi: Vec<_> = kpis.iter().map(|k| k.conclusion).collect();
            Some(roll_up_case(key, &per_kpi, config.options.unresolved_case)?)
        } else {
            None
        };

        rows.push(ReportRow {
            key: key.clone(),
            kpis,
            conclusion,
        });
    }

    Ok(Report {
        schema: REPORT_SCHEMA_V1.to_string(),
        key_names: config.keys.iter().map(|k| k.name.clone()).collect(),
        kpi_names: config.kpis.iter().map(|k| k.name.clone()).collect(),
        rows,
    })
}

/// Descriptive statistics plus significance for one KPI of one case.
pub fn case_statistics(base: &[f64], test: &[f64], kind: TestKind) -> CaseStatistics {
    let d = describe(base, test);
    CaseStatistics {
        base_mean: d.base_mean,
        base_pctsd: d.base_pctsd,
        test_mean: d.test_mean,
        test_pctsd: d.test_pctsd,
        pct_diff: d.pct_diff,
        significance: significance(base, test, kind),
    }
}

/// Cases of `report` for which no KPI could be classified.
pub fn unresolved_cases(report: &Report) -> impl Iterator<Item = &ReportRow> {
    report
        .rows
        .iter()
        .filter(|r| r.kpis.iter().all(|k| k.conclusion.is_none()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfverdict_error::Error;
    use perfverdict_types::{Conclusion, KeySpec, KpiSpec, ReportOptions, UnresolvedCasePolicy};

    fn config() -> ReportConfig {
        ReportConfig {
            keys: vec![
                KeySpec {
                    name: "RW".into(),
                    from: "rw".into(),
                    unit: None,
                    round: None,
                },
                KeySpec {
                    name: "BS".into(),
                    from: "bs".into(),
                    unit: Some("KiB".into()),
                    round: None,
                },
            ],
            kpis: vec![KpiSpec {
                from: "iops".into(),
                ..KpiSpec::new("IOPS")
            }],
            options: ReportOptions::default(),
        }
    }

    fn table(name: &str, rows: &[(&str, f64, f64)]) -> SampleTable {
        let mut t = SampleTable::new(name, vec!["rw".into(), "bs".into(), "iops".into()]);
        for (rw, bs, iops) in rows {
            t.push_row(vec![(*rw).into(), Value::Number(*bs), Value::from(*iops)])
                .unwrap();
        }
        t
    }

    #[test]
    fn iops_gain_is_dramatic_improvement() {
        let base = table("BASE", &[("read", 4.0, 1000.0), ("read", 4.0, 1000.0), ("read", 4.0, 1000.0)]);
        let test = table("TEST", &[("read", 4.0, 1200.0), ("read", 4.0, 1200.0), ("read", 4.0, 1200.0)]);

        let report = build_report(&base, &test, &config()).unwrap();
        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        let iops = row.kpi("IOPS").unwrap();
        assert_eq!(iops.stats.base_mean, 1000.0);
        assert_eq!(iops.stats.test_mean, 1200.0);
        assert!((iops.stats.pct_diff - 20.0).abs() < 1e-9);
        assert_eq!(iops.conclusion, Some(Conclusion::DramaticImprovement));
        assert_eq!(row.conclusion, Some(Conclusion::DramaticImprovement));
    }

    #[test]
    fn rows_are_sorted_by_key_and_deduplicated() {
        let base = table("BASE", &[("write", 4.0, 10.0), ("read", 16.0, 10.0), ("read", 4.0, 10.0)]);
        let test = table("TEST", &[("read", 4.0, 11.0), ("write", 4.0, 9.0), ("read", 4.0, 12.0)]);

        let report = build_report(&base, &test, &config()).unwrap();
        let keys: Vec<String> = report.rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, ["(read, 4)", "(read, 16)", "(write, 4)"]);
    }

    #[test]
    fn one_sided_case_is_not_applicable() {
        let base = table("BASE", &[("read", 4.0, 10.0), ("read", 4.0, 11.0)]);
        let test = table("TEST", &[("write", 4.0, 10.0), ("write", 4.0, 11.0)]);

        let report = build_report(&base, &test, &config()).unwrap();
        assert_eq!(report.rows.len(), 2);
        for row in &report.rows {
            assert_eq!(row.kpis[0].conclusion, None);
            assert_eq!(row.conclusion, Some(Conclusion::InvalidData));
        }
        assert_eq!(unresolved_cases(&report).count(), 2);
    }

    #[test]
    fn test_only_items_ignore_base_only_cases() {
        let base = table("BASE", &[("read", 4.0, 10.0), ("write", 4.0, 11.0)]);
        let test = table("TEST", &[("read", 4.0, 10.0)]);

        let mut cfg = config();
        cfg.options.report_items = ReportItems::TestOnly;
        let report = build_report(&base, &test, &cfg).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].key.to_string(), "(read, 4)");
    }

    #[test]
    fn zero_base_mean_never_reports_negligible() {
        let base = table("BASE", &[("read", 4.0, 0.0), ("read", 4.0, 0.0)]);
        let test = table("TEST", &[("read", 4.0, 0.0), ("read", 4.0, 0.0)]);

        let report = build_report(&base, &test, &config()).unwrap();
        let iops = report.rows[0].kpi("IOPS").unwrap();
        assert!(iops.stats.pct_diff.is_nan());
        assert!(iops.stats.base_pctsd.is_nan());
        assert_eq!(report.rows[0].conclusion, Some(Conclusion::InvalidData));
    }

    #[test]
    fn identical_constant_samples_are_invalid_data() {
        let base = table("BASE", &[("read", 4.0, 1000.0), ("read", 4.0, 1000.0)]);
        let test = table("TEST", &[("read", 4.0, 1000.0), ("read", 4.0, 1000.0)]);

        let report = build_report(&base, &test, &config()).unwrap();
        let iops = report.rows[0].kpi("IOPS").unwrap();
        assert_eq!(iops.stats.pct_diff, 0.0);
        assert!(iops.stats.significance.is_nan());
        assert_eq!(iops.conclusion, Some(Conclusion::InvalidData));
        assert_eq!(report.rows[0].conclusion, Some(Conclusion::InvalidData));
    }

    #[test]
    fn missing_key_cells_form_one_case() {
        let sparse = |name: &str, iops: [f64; 2]| {
            let mut t = SampleTable::new(name, vec!["rw".into(), "bs".into(), "iops".into()]);
            for v in iops {
                t.push_row(vec![Value::Missing, Value::Number(4.0), Value::Number(v)])
                    .unwrap();
            }
            t
        };

        let report =
            build_report(&sparse("BASE", [1000.0, 1100.0]), &sparse("TEST", [1000.0, 1100.0]), &config())
                .unwrap();
        assert_eq!(report.rows.len(), 1);
        let iops = report.rows[0].kpi("IOPS").unwrap();
        assert_eq!(iops.stats.base_mean, 1050.0);
        assert_eq!(iops.stats.test_mean, 1050.0);
    }

    #[test]
    fn unresolved_case_can_abort() {
        let base = table("BASE", &[("read", 4.0, 0.0), ("read", 4.0, 0.0)]);
        let test = table("TEST", &[("read", 4.0, 5.0), ("read", 4.0, 6.0)]);

        let mut cfg = config();
        cfg.options.unresolved_case = UnresolvedCasePolicy::Error;
        let err = build_report(&base, &test, &cfg).unwrap_err();
        assert!(matches!(
            err,
            Error::Structural(StructuralError::UnresolvedCase { .. })
        ));
    }

    #[test]
    fn missing_from_column_is_structural_error() {
        let base = SampleTable::new("BASE", vec!["rw".into(), "iops".into()]);
        let test = table("TEST", &[]);

        let err = build_report(&base, &test, &config()).unwrap_err();
        assert_eq!(err.to_string(), "BASE table has no column \"bs\"");
    }

    #[test]
    fn text_in_kpi_column_is_rejected() {
        let mut base = SampleTable::new("BASE", vec!["rw".into(), "bs".into(), "iops".into()]);
        base.push_row(vec!["read".into(), Value::Number(4.0), "fast".into()])
            .unwrap();
        let test = table("TEST", &[]);

        let err = build_report(&base, &test, &config()).unwrap_err();
        assert!(matches!(
            err,
            Error::Structural(StructuralError::NonNumericKpi { row: 0, .. })
        ));
    }

    #[test]
    fn missing_samples_are_skipped_in_means() {
        let base = table("BASE", &[("read", 4.0, 1000.0), ("read", 4.0, f64::NAN), ("read", 4.0, 1000.0)]);
        let test = table("TEST", &[("read", 4.0, 1000.0), ("read", 4.0, 1000.0)]);

        let report = build_report(&base, &test, &config()).unwrap();
        let iops = report.rows[0].kpi("IOPS").unwrap();
        assert_eq!(iops.stats.base_mean, 1000.0);
        // A missing sample makes the t-test undefined.
        assert!(iops.stats.significance.is_nan());
        assert_eq!(iops.conclusion, Some(Conclusion::InvalidData));
    }

    #[test]
    fn invalid_threshold_aborts_before_reading_tables() {
        let mut cfg = config();
        cfg.kpis[0].confidence_threshold = 2.0;
        let empty = SampleTable::new("BASE", vec![]);
        let err = build_report(&empty, &empty, &cfg).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn case_conclusion_can_be_disabled() {
        let base = table("BASE", &[("read", 4.0, 10.0), ("read", 4.0, 11.0)]);
        let test = table("TEST", &[("read", 4.0, 10.0), ("read", 4.0, 11.0)]);

        let mut cfg = config();
        cfg.options.case_conclusion = false;
        let report = build_report(&base, &test, &cfg).unwrap();
        assert_eq!(report.rows[0].conclusion, None);
    }

    #[test]
    fn paired_mode_uses_matched_samples() {
        let base = table("BASE", &[("read", 4.0, 100.0), ("read", 4.0, 200.0), ("read", 4.0, 300.0)]);
        let test = table("TEST", &[("read", 4.0, 110.0), ("read", 4.0, 211.0), ("read", 4.0, 309.0)]);

        let independent = build_report(&base, &test, &config()).unwrap();
        let mut cfg = config();
        cfg.options.paired = true;
        let paired = build_report(&base, &test, &cfg).unwrap();

        let si = independent.rows[0].kpis[0].stats.significance;
        let sp = paired.rows[0].kpis[0].stats.significance;
        assert!(sp > si, "paired {sp} should exceed independent {si}");
    }
}
