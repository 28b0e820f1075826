//! Unified error types for perfverdict.
//!
//! Three failure families abort report generation:
//! - [`ConfigError`]: the declarative configuration is unusable.
//! - [`StructuralError`]: the input tables do not match the configuration.
//! - [`AggregationError`]: the benchmark statistics cannot be formed.
//!
//! Numeric indeterminacy (zero means, too few samples, undefined p-values)
//! is deliberately absent here: it flows through the engine as `NaN`.

/// Which configuration section an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Keys,
    Kpis,
    Columns,
    Metadata,
}

impl std::fmt::Display for ConfigSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConfigSection::Keys => "keys",
            ConfigSection::Kpis => "kpis",
            ConfigSection::Columns => "columns",
            ConfigSection::Metadata => "metadata",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{section}[{index}]: \"name\" must be given")]
    MissingName { section: ConfigSection, index: usize },

    #[error("{section}: duplicate name {name:?}")]
    DuplicateName { section: ConfigSection, name: String },

    #[error("kpi {kpi:?}: invalid value for {field}: {value} (expected {expected})")]
    ThresholdOutOfRange {
        kpi: String,
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("column {column:?}: invalid round value {value} (expected 0..=15)")]
    InvalidRound { column: String, value: i64 },

    #[error("primary metric {0:?} is not a configured kpi")]
    UnknownPrimaryMetric(String),

    #[error("defaults.fillna {0:?} would read back as a conclusion")]
    FillnaIsConclusion(String),

    #[error("{section}[{index}]: {message}")]
    InvalidEntry {
        section: ConfigSection,
        index: usize,
        message: String,
    },

    #[error("configuration must declare at least one {0} entry")]
    EmptySection(ConfigSection),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructuralError {
    #[error("{table} table has no column {column:?}")]
    MissingColumn { table: String, column: String },

    #[error("{table} table row {row}: expected {expected} cells, found {found}")]
    RaggedRow {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{table} table row {row}: kpi column {column:?} holds non-numeric value {value:?}")]
    NonNumericKpi {
        table: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error("case {case} has no kpi with a resolvable conclusion")]
    UnresolvedCase { case: String },

    #[error("{0} table is empty")]
    EmptyTable(String),

    #[error("malformed input: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    #[error("cannot compute benchmark statistics: report has no cases")]
    NoCases,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid toml: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
