//! Shared types for perfverdict.
//!
//! Design goal: versioned, explicit, boring.
//! These structs describe sample tables, the declarative configuration,
//! comparison reports and benchmark statistics.

mod columns;
mod conclusion;
mod config;
mod metadata;
mod report;
mod table;

pub use columns::{CASE_CONCLUSION_COLUMN, KpiColumn, strip_unit, with_unit};
pub use conclusion::{Conclusion, ParseConclusionError};
pub use config::*;
pub use metadata::{MetadataComparison, MetadataRow};
pub use report::{
    nan_as_null, BenchmarkResult, BenchmarkStatistics, CaseStatistics, KpiOutcome, Report,
    ReportRow, REPORT_SCHEMA_V1,
};
pub use table::{KeyTuple, SampleTable, Value};
