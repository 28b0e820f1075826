//! Fuzz target for re-reading rendered reports.
//!
//! A report that parses must render again without panicking, and every
//! row must carry one outcome per KPI.

#![no_main]

use libfuzzer_sys::fuzz_target;
use perfverdict_ingest::{parse_report, read_csv};
use perfverdict_render::OutputFormat;
use perfverdict_types::{KpiSpec, ReportConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = read_csv("REPORT", text) else {
        return;
    };
    let Ok(report) = parse_report(&table) else {
        return;
    };

    for row in &report.rows {
        assert_eq!(row.kpis.len(), report.kpi_names.len());
    }

    let config = ReportConfig {
        keys: Vec::new(),
        kpis: report.kpi_names.iter().map(KpiSpec::new).collect(),
        options: Default::default(),
    };
    let _ = perfverdict_render::render_report(&report, &config).write(OutputFormat::Csv);
});
