//! JSON record readers: a top-level array of objects, or JSON Lines.

use perfverdict_error::StructuralError;
use perfverdict_types::{SampleTable, Value};
use serde_json::{Map, Value as Json};

/// Read records into a table. Columns are the union of record keys in
/// first-seen order; a key absent from a record is a missing cell.
pub fn read_json_records(name: &str, text: &str) -> Result<SampleTable, StructuralError> {
    let records = parse_records(name, text)?;

    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    if columns.first().is_some_and(|c| crate::csv::is_index_column(c)) {
        columns.remove(0);
    }

    let mut table = SampleTable::new(name, columns.clone());
    for record in &records {
        let row = columns
            .iter()
            .map(|c| record.get(c).map_or(Value::Missing, Value::from_json))
            .collect();
        table.push_row(row)?;
    }
    Ok(table)
}

fn parse_records(name: &str, text: &str) -> Result<Vec<Map<String, Json>>, StructuralError> {
    let malformed = |e: serde_json::Error| StructuralError::Malformed(format!("{name}: {e}"));

    if text.trim_start().starts_with('[') {
        let values: Vec<Json> = serde_json::from_str(text).map_err(malformed)?;
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| into_object(name, i, v))
            .collect()
    } else {
        text.lines()
            .filter(|l| !l.trim().is_empty())
            .enumerate()
            .map(|(i, l)| {
                let v: Json = serde_json::from_str(l).map_err(malformed)?;
                into_object(name, i, v)
            })
            .collect()
    }
}

fn into_object(name: &str, index: usize, v: Json) -> Result<Map<String, Json>, StructuralError> {
    match v {
        Json::Object(m) => Ok(m),
        other => Err(StructuralError::Malformed(format!(
            "{name}: record {index} is not an object: {other}"
        ))),
    }
}
