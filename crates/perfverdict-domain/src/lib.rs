//! Domain logic for perfverdict.
//!
//! This crate is intentionally I/O-free: it does math and policy.

mod aggregate;
mod classify;
mod metadata;
mod report;
mod rollup;

pub use aggregate::{AggregateOptions, aggregate, format_signed_pct, infer_primary_metrics};
pub use classify::{Thresholds, classify};
pub use metadata::compare_metadata;
pub use report::{build_report, case_statistics, unresolved_cases};
pub use rollup::{roll_up, roll_up_case, roll_up_labels};
