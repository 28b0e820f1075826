//! Rendering of extracted testrun tables and metadata comparisons.

use crate::table::{Cell, RenderedTable, number_cell};
use perfverdict_types::{MetadataComparison, SampleTable, TestrunConfig, Value, with_unit};

/// Render a testrun table with per-column units and rounding.
///
/// Columns of `table` that have no matching config column are written
/// as-is with the default rounding.
pub fn render_testrun(table: &SampleTable, config: &TestrunConfig) -> RenderedTable {
    let specs: Vec<_> = table
        .columns()
        .iter()
        .map(|name| config.columns.iter().find(|c| &c.name == name))
        .collect();

    let columns = table
        .columns()
        .iter()
        .zip(&specs)
        .map(|(name, spec)| with_unit(name, spec.and_then(|c| c.unit.as_deref())))
        .collect();

    let rows = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&specs)
                .map(|(value, spec)| {
                    let round = spec.and_then(|c| c.round).or(config.round);
                    value_cell(value, round, &config.fillna)
                })
                .collect()
        })
        .collect();

    RenderedTable { columns, rows }
}

/// NAME / KEY / BASE / TEST, without KEY when `show_keys` is off.
pub fn render_metadata(comparison: &MetadataComparison, fillna: &str) -> RenderedTable {
    let mut columns = vec!["NAME".to_string()];
    if comparison.show_keys {
        columns.push("KEY".to_string());
    }
    columns.extend(["BASE".to_string(), "TEST".to_string()]);

    let rows = comparison
        .rows
        .iter()
        .map(|r| {
            let mut cells = vec![Cell::Text(r.name.clone())];
            if comparison.show_keys {
                cells.push(Cell::Text(r.key.clone()));
            }
            cells.push(value_cell(&r.base, None, fillna));
            cells.push(value_cell(&r.test, None, fillna));
            cells
        })
        .collect();

    RenderedTable { columns, rows }
}

fn value_cell(value: &Value, round: Option<u32>, fill: &str) -> Cell {
    match value {
        Value::Number(v) => number_cell(*v, round, fill),
        Value::Text(s) => Cell::Text(s.clone()),
        Value::Missing => Cell::Fill(fill.to_string()),
    }
}
