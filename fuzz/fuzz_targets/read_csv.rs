//! Fuzz target for the sample table readers.
//!
//! Parsed tables must be rectangular: every row has one cell per column.

#![no_main]

use libfuzzer_sys::fuzz_target;
use perfverdict_ingest::{TableFormat, read_table};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    for format in [TableFormat::Csv, TableFormat::Json] {
        if let Ok(table) = read_table("FUZZ", text, format) {
            for row in table.rows() {
                assert_eq!(row.len(), table.columns().len());
            }
        }
    }
});
