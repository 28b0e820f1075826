//! Re-read a rendered comparison report.

use perfverdict_error::StructuralError;
use perfverdict_types::{
    CASE_CONCLUSION_COLUMN, CaseStatistics, Conclusion, KeyTuple, KpiColumn, KpiOutcome,
    REPORT_SCHEMA_V1, Report, ReportRow, SampleTable, Value,
};

#[derive(Debug, Default)]
struct KpiColumns {
    name: String,
    idx: [Option<usize>; 7],
}

impl KpiColumns {
    fn get(&self, col: KpiColumn) -> Option<usize> {
        self.idx[column_slot(col)]
    }
}

fn column_slot(col: KpiColumn) -> usize {
    KpiColumn::ALL
        .iter()
        .position(|c| *c == col)
        .unwrap_or_default()
}

/// Rebuild a [`Report`] from its rendered table.
///
/// A KPI is recognised by its `-CON` column; its `-%DF` column is required,
/// the other statistic columns are optional. Every column that belongs to
/// no KPI, apart from `Conclusion`, is a key column. Filled cells (the
/// rendered stand-in for NaN) read back as NaN or "not applicable".
pub fn parse_report(table: &SampleTable) -> Result<Report, StructuralError> {
    let mut kpis: Vec<KpiColumns> = Vec::new();
    let mut key_idx = Vec::new();
    let mut case_idx = None;

    for (i, header) in table.columns().iter().enumerate() {
        if header == CASE_CONCLUSION_COLUMN {
            case_idx = Some(i);
            continue;
        }
        match KpiColumn::parse_header(header) {
            Some((name, col)) => {
                let pos = match kpis.iter().position(|k| k.name == name) {
                    Some(p) => p,
                    None => {
                        kpis.push(KpiColumns {
                            name: name.to_string(),
                            ..Default::default()
                        });
                        kpis.len() - 1
                    }
                };
                kpis[pos].idx[column_slot(col)] = Some(i);
            }
            None => key_idx.push(i),
        }
    }

    // Groups without a -CON column were key columns that merely look like
    // statistics.
    let (kpis, stray): (Vec<_>, Vec<_>) = kpis
        .into_iter()
        .partition(|k| k.get(KpiColumn::Conclusion).is_some());
    key_idx.extend(stray.iter().flat_map(|k| k.idx.iter().flatten().copied()));
    key_idx.sort_unstable();

    if kpis.is_empty() {
        return Err(StructuralError::MissingColumn {
            table: table.name().to_string(),
            column: "<KPI>-CON".to_string(),
        });
    }
    for k in &kpis {
        if k.get(KpiColumn::PctDiff).is_none() {
            return Err(StructuralError::MissingColumn {
                table: table.name().to_string(),
                column: KpiColumn::PctDiff.header(&k.name, None),
            });
        }
    }

    let number = |row: &[Value], idx: Option<usize>| {
        idx.and_then(|i| row[i].as_f64()).unwrap_or(f64::NAN)
    };
    let conclusion = |row: &[Value], idx: Option<usize>| match idx.map(|i| &row[i]) {
        Some(Value::Text(s)) => Conclusion::parse(s),
        _ => None,
    };

    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let row: &[Value] = row;
            ReportRow {
                key: KeyTuple(key_idx.iter().map(|&i| row[i].clone()).collect()),
                kpis: kpis
                    .iter()
                    .map(|k| KpiOutcome {
                        kpi: k.name.clone(),
                        stats: CaseStatistics {
                            base_mean: number(row, k.get(KpiColumn::BaseAvg)),
                            base_pctsd: number(row, k.get(KpiColumn::BasePctSd)),
                            test_mean: number(row, k.get(KpiColumn::TestAvg)),
                            test_pctsd: number(row, k.get(KpiColumn::TestPctSd)),
                            pct_diff: number(row, k.get(KpiColumn::PctDiff)),
                            significance: number(row, k.get(KpiColumn::Significance)),
                        },
                        conclusion: conclusion(row, k.get(KpiColumn::Conclusion)),
                    })
                    .collect(),
                conclusion: conclusion(row, case_idx),
            }
        })
        .collect();

    Ok(Report {
        schema: REPORT_SCHEMA_V1.to_string(),
        key_names: key_idx.iter().map(|&i| table.columns()[i].clone()).collect(),
        kpi_names: kpis.iter().map(|k| k.name.clone()).collect(),
        rows,
    })
}
