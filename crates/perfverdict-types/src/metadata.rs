//! BASE vs TEST metadata comparison output.

use crate::Value;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One NAME / KEY / BASE / TEST line.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MetadataRow {
    pub name: String,
    /// The looked-up key; `"test_key/base_key"` when the two sides differ.
    pub key: String,
    pub base: Value,
    pub test: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MetadataComparison {
    pub show_keys: bool,
    pub rows: Vec<MetadataRow>,
}
