//! perfverdict: compare a TEST benchmark run against a BASE run and
//! classify every case.
//!
//! This crate re-exports the workspace crates under one name:
//!
//! ```no_run
//! use perfverdict::config::{parse_config, resolve_report_config, ConfigFormat};
//! use perfverdict::ingest::read_csv;
//! use perfverdict::domain::build_report;
//! use perfverdict::render::render_report;
//!
//! # fn main() -> anyhow::Result<()> {
//! let file = parse_config(&std::fs::read_to_string("perfverdict.toml")?, ConfigFormat::Toml)?;
//! let config = resolve_report_config(&file)?;
//! let base = read_csv("BASE", &std::fs::read_to_string("base.csv")?)?;
//! let test = read_csv("TEST", &std::fs::read_to_string("test.csv")?)?;
//! let report = build_report(&base, &test, &config)?;
//! print!("{}", render_report(&report, &config).to_csv());
//! # Ok(())
//! # }
//! ```

pub use perfverdict_app as app;
pub use perfverdict_config as config;
pub use perfverdict_domain as domain;
pub use perfverdict_error as error;
pub use perfverdict_ingest as ingest;
pub use perfverdict_render as render;
pub use perfverdict_significance as significance;
pub use perfverdict_stats as stats;
pub use perfverdict_types as types;
pub use perfverdict_validation as validation;

pub use perfverdict_error::{Error, Result};
pub use perfverdict_types::{
    BenchmarkResult, BenchmarkStatistics, Conclusion, Report, ReportConfig, SampleTable,
};
