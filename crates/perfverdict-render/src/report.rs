//! Comparison report rendering.

use crate::table::{Cell, RenderedTable, number_cell, round_to};
use perfverdict_types::{
    CASE_CONCLUSION_COLUMN, Conclusion, KeySpec, KpiColumn, KpiOutcome, KpiSpec, Report,
    ReportConfig, Value, with_unit,
};

/// Significance is always shown with two decimals.
const SIGNIFICANCE_DECIMALS: u32 = 2;

/// Render a report: key columns, the optional case `Conclusion`, then the
/// seven statistic columns of every KPI.
///
/// Rounding and fill only touch the rendered cells; the report keeps its
/// full-precision values and NaNs.
pub fn render_report(report: &Report, config: &ReportConfig) -> RenderedTable {
    let opts = &config.options;
    let keys: Vec<Option<&KeySpec>> = report
        .key_names
        .iter()
        .map(|name| config.keys.iter().find(|k| &k.name == name))
        .collect();
    let kpis: Vec<Option<&KpiSpec>> = report
        .kpi_names
        .iter()
        .map(|name| config.kpis.iter().find(|k| &k.name == name))
        .collect();

    let mut columns: Vec<String> = report
        .key_names
        .iter()
        .zip(&keys)
        .map(|(name, spec)| with_unit(name, spec.and_then(|k| k.unit.as_deref())))
        .collect();
    if opts.case_conclusion {
        columns.push(CASE_CONCLUSION_COLUMN.to_string());
    }
    for (name, spec) in report.kpi_names.iter().zip(&kpis) {
        let unit = spec.and_then(|k| k.unit.as_deref());
        columns.extend(KpiColumn::ALL.iter().map(|c| c.header(name, unit)));
    }

    let rows = report
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<Cell> = row
                .key
                .values()
                .iter()
                .zip(&keys)
                .map(|(value, spec)| {
                    let round = spec.and_then(|k| k.round).or(opts.round);
                    key_cell(value, round, &opts.fillna)
                })
                .collect();

            if opts.case_conclusion {
                cells.push(conclusion_cell(
                    row.conclusion,
                    opts.case_conclusion_abbr,
                    &opts.fillna,
                ));
            }

            for (name, spec) in report.kpi_names.iter().zip(&kpis) {
                let round = spec.and_then(|k| k.round).or(opts.round);
                let round_pct = spec.and_then(|k| k.round_pct).or(opts.round_pct);
                match row.kpi(name) {
                    Some(outcome) => cells.extend(kpi_cells(
                        outcome,
                        round,
                        round_pct,
                        opts.abbreviation,
                        &opts.fillna,
                    )),
                    None => cells.extend(
                        KpiColumn::ALL
                            .iter()
                            .map(|_| Cell::Fill(opts.fillna.clone())),
                    ),
                }
            }
            cells
        })
        .collect();

    RenderedTable { columns, rows }
}

fn key_cell(value: &Value, round: Option<u32>, fill: &str) -> Cell {
    match value {
        Value::Number(v) => number_cell(*v, round, fill),
        Value::Text(s) => Cell::Text(s.clone()),
        Value::Missing => Cell::Fill(fill.to_string()),
    }
}

fn conclusion_cell(conclusion: Option<Conclusion>, abbreviate: bool, fill: &str) -> Cell {
    match conclusion {
        Some(c) => Cell::Text(c.render(abbreviate).to_string()),
        None => Cell::Fill(fill.to_string()),
    }
}

fn kpi_cells<'a>(
    outcome: &'a KpiOutcome,
    round: Option<u32>,
    round_pct: Option<u32>,
    abbreviate: bool,
    fill: &str,
) -> impl Iterator<Item = Cell> + 'a {
    let fill = fill.to_string();
    KpiColumn::ALL.into_iter().map(move |col| {
        let s = &outcome.stats;
        match col {
            KpiColumn::BaseAvg => number_cell(s.base_mean, round, &fill),
            KpiColumn::BasePctSd => number_cell(s.base_pctsd, round_pct, &fill),
            KpiColumn::TestAvg => number_cell(s.test_mean, round, &fill),
            KpiColumn::TestPctSd => number_cell(s.test_pctsd, round_pct, &fill),
            KpiColumn::PctDiff => number_cell(s.pct_diff, round_pct, &fill),
            KpiColumn::Significance if s.significance.is_finite() => {
                Cell::Number(round_to(s.significance, SIGNIFICANCE_DECIMALS))
            }
            KpiColumn::Significance => Cell::Fill(fill.clone()),
            KpiColumn::Conclusion => conclusion_cell(outcome.conclusion, abbreviate, &fill),
        }
    })
}
