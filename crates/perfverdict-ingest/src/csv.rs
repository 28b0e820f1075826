//! RFC 4180 delimited-text reader on top of the `csv` crate.

use perfverdict_error::StructuralError;
use perfverdict_types::{SampleTable, Value};

/// Split `text` into records of raw fields.
///
/// Quoted fields may contain commas, newlines and doubled quotes. Blank
/// lines are skipped. Records may differ in length; the table reader
/// reports that against its header.
pub fn parse_records(text: &str) -> Result<Vec<Vec<String>>, StructuralError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| StructuralError::Malformed(e.to_string()))
        })
        .collect()
}

/// True for the index column a dataframe writer puts first.
pub fn is_index_column(header: &str) -> bool {
    let h = header.trim();
    h.is_empty() || h.starts_with("Unnamed: 0")
}

/// Read a delimited-text table; a leading unnamed index column is dropped.
pub fn read_csv(name: &str, text: &str) -> Result<SampleTable, StructuralError> {
    let mut records = parse_records(text)?.into_iter();
    let mut header = records
        .next()
        .ok_or_else(|| StructuralError::EmptyTable(name.to_string()))?;

    let skip = usize::from(header.first().is_some_and(|h| is_index_column(h)));
    header.drain(..skip);

    let mut table = SampleTable::new(name, header.into_iter().map(|h| h.trim().to_string()).collect());
    for record in records {
        let row = record.iter().skip(skip).map(|c| Value::from_cell(c)).collect();
        table.push_row(row)?;
    }
    Ok(table)
}
