//! Build a sample table from a pbench-style datastore.

use perfverdict_error::StructuralError;
use perfverdict_types::{ColumnSource, SampleTable, TestrunConfig, Value};
use serde_json::{Map, Value as Json};

/// An iteration that was asked to split but whose multi-sample columns
/// disagree on the sample count. It is kept as a single row.
#[derive(Debug, Clone, PartialEq)]
pub struct UnevenSplit {
    pub iteration: usize,
    /// `(column, sample count)` for every multi-sample column.
    pub lengths: Vec<(String, usize)>,
}

#[derive(Debug)]
pub struct Extraction {
    pub table: SampleTable,
    pub uneven: Vec<UnevenSplit>,
}

enum Cell {
    One(Value),
    Many(Vec<Value>),
    SampleIndex,
}

impl Cell {
    fn first(&self) -> Value {
        match self {
            Cell::One(v) => v.clone(),
            Cell::Many(vs) => vs.first().cloned().unwrap_or(Value::Missing),
            Cell::SampleIndex => Value::Missing,
        }
    }
}

/// One row per iteration, or one row per sample when `split` is set.
///
/// `datastore` must be an array of iteration objects.
pub fn extract_testrun(
    datastore: &Json,
    metadata: &Map<String, Json>,
    config: &TestrunConfig,
) -> Result<Extraction, StructuralError> {
    let iterations = datastore.as_array().ok_or_else(|| {
        StructuralError::Malformed("datastore must be an array of iterations".to_string())
    })?;

    let columns = config.columns.iter().map(|c| c.name.clone()).collect();
    let mut table = SampleTable::new("TESTRUN", columns);
    let mut uneven = Vec::new();

    for (n, iteration) in iterations.iter().enumerate() {
        let cells: Vec<Cell> = config
            .columns
            .iter()
            .map(|c| resolve(&c.source, iteration, metadata))
            .collect();

        let lengths: Vec<(String, usize)> = config
            .columns
            .iter()
            .zip(&cells)
            .filter_map(|(c, cell)| match cell {
                Cell::Many(vs) => Some((c.name.clone(), vs.len())),
                _ => None,
            })
            .collect();

        let first_len = lengths.first().map(|(_, l)| *l);
        let samples = match first_len {
            Some(len) if config.split && lengths.iter().all(|(_, l)| *l == len) => Some(len),
            Some(_) if config.split => {
                uneven.push(UnevenSplit {
                    iteration: n,
                    lengths,
                });
                None
            }
            _ => None,
        };

        match samples {
            Some(len) => {
                for i in 0..len {
                    let row = cells
                        .iter()
                        .map(|cell| match cell {
                            Cell::One(v) => v.clone(),
                            Cell::Many(vs) => vs[i].clone(),
                            Cell::SampleIndex => Value::Number((i + 1) as f64),
                        })
                        .collect();
                    table.push_row(row)?;
                }
            }
            None => {
                let row = cells
                    .iter()
                    .map(|cell| match cell {
                        Cell::SampleIndex => Value::Text("all".to_string()),
                        other => other.first(),
                    })
                    .collect();
                table.push_row(row)?;
            }
        }
    }

    Ok(Extraction { table, uneven })
}

fn resolve(source: &ColumnSource, iteration: &Json, metadata: &Map<String, Json>) -> Cell {
    match source {
        ColumnSource::Metadata { key } => {
            Cell::One(metadata.get(key).map_or(Value::Missing, Value::from_json))
        }
        ColumnSource::Datastore { pointer, factor } => {
            let scale = |v: Value| match (v, factor) {
                (Value::Number(x), Some(f)) => Value::Number(x * f),
                (v, _) => v,
            };
            match iteration.pointer(pointer) {
                None => Cell::One(Value::Missing),
                Some(Json::Array(items)) if items.len() > 1 => {
                    Cell::Many(items.iter().map(|i| scale(Value::from_json(i))).collect())
                }
                Some(Json::Array(items)) => Cell::One(
                    items
                        .first()
                        .map_or(Value::Missing, |i| scale(Value::from_json(i))),
                ),
                Some(v) => Cell::One(scale(Value::from_json(v))),
            }
        }
        ColumnSource::Sample => Cell::SampleIndex,
        ColumnSource::Constant { value } => Cell::One(Value::from_cell(value)),
    }
}
