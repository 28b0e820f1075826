//! Input readers for perfverdict.
//!
//! Everything here parses text or JSON that the caller has already loaded;
//! no function touches the filesystem.

mod csv;
mod json;
mod report;
mod testrun;

pub use crate::csv::{is_index_column, parse_records, read_csv};
pub use json::read_json_records;
pub use report::parse_report;
pub use testrun::{Extraction, UnevenSplit, extract_testrun};

use perfverdict_error::StructuralError;
use perfverdict_types::SampleTable;
use std::path::Path;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TableFormat {
    #[default]
    Csv,
    /// A JSON array of records, or JSON Lines.
    Json,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ["json", "jsonl", "ndjson"].iter().any(|j| ext.eq_ignore_ascii_case(j)) => {
                TableFormat::Json
            }
            _ => TableFormat::Csv,
        }
    }
}

pub fn read_table(name: &str, text: &str, format: TableFormat) -> Result<SampleTable, StructuralError> {
    match format {
        TableFormat::Csv => read_csv(name, text),
        TableFormat::Json => read_json_records(name, text),
    }
}
