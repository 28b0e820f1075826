//! Config file schema and the resolved, immutable report configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ----------------------------
// Config file schema
// ----------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub keys: Vec<KeyConfigFile>,

    #[serde(default)]
    pub kpis: Vec<KpiConfigFile>,

    #[serde(default)]
    pub kpi_defaults: KpiDefaultsConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub testrun: Option<TestrunConfigFile>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataConfigFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct KeyConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Source column; defaults to `name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct KpiConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Source column; defaults to `name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_pct: Option<i64>,

    #[serde(flatten)]
    pub thresholds: KpiDefaultsConfig,
}

/// Fallbacks for any KPI field not set on the KPI itself.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct KpiDefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub higher_is_better: Option<bool>,

    /// Fraction; 0 disables the high-variance check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pctdev_threshold: Option<f64>,

    /// Minimum significance (1 - p) for a change to count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,

    /// Fraction below which a change is negligible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negligible_threshold: Option<f64>,

    /// Fraction above which a change is dramatic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regression_threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct DefaultsConfig {
    /// Decimals for absolute columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<i64>,

    /// Decimals for %SD and %DF columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_pct: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillna: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", alias = "use_abbr")]
    pub abbreviation: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_conclusion: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_conclusion_abbr: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_items: Option<ReportItems>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved_case: Option<UnresolvedCasePolicy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paired: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_metrics: Option<Vec<String>>,
}

/// Which table(s) the case list is built from.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportItems {
    #[default]
    #[serde(alias = "combined_base")]
    Combined,
    TestOnly,
}

/// What to do with a case none of whose KPIs could be classified.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedCasePolicy {
    /// Report the case as Invalid Data.
    #[default]
    InvalidData,
    /// Abort report generation.
    Error,
}

// ----------------------------
// Testrun extraction schema
// ----------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct TestrunConfigFile {
    #[serde(default)]
    pub defaults: TestrunDefaultsConfig,

    #[serde(default)]
    pub columns: Vec<ColumnConfigFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct TestrunDefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillna: Option<String>,

    /// Expand multi-sample iterations into one row per sample.
    #[serde(default)]
    pub split: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ColumnConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<i64>,

    #[serde(flatten)]
    pub source: ColumnSource,
}

/// Where a testrun column takes its value from.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ColumnSource {
    Metadata {
        key: String,
    },
    Datastore {
        /// RFC 6901 JSON pointer into one iteration object.
        pointer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        factor: Option<f64>,
    },
    Sample,
    Constant {
        value: String,
    },
}

// ----------------------------
// Metadata comparison schema
// ----------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MetadataConfigFile {
    #[serde(default = "default_true")]
    pub show_keys: bool,

    #[serde(default = "default_true")]
    pub show_undefined: bool,

    #[serde(default)]
    pub entries: Vec<MetadataEntryConfig>,
}

impl Default for MetadataConfigFile {
    fn default() -> Self {
        Self {
            show_keys: true,
            show_undefined: true,
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct MetadataEntryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_key: Option<String>,
}

fn default_true() -> bool {
    true
}

// ----------------------------
// Resolved configuration
// ----------------------------

pub const DEFAULT_HIGHER_IS_BETTER: bool = true;
pub const DEFAULT_MAX_PCTDEV_THRESHOLD: f64 = 0.10;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.95;
pub const DEFAULT_NEGLIGIBLE_THRESHOLD: f64 = 0.05;
pub const DEFAULT_REGRESSION_THRESHOLD: f64 = 0.10;

/// A grouping-key column.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct KeySpec {
    pub name: String,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
}

/// A compared metric with its direction and thresholds.
///
/// Thresholds are fractions (0.10 = 10%), except `confidence_threshold`
/// which is compared against significance directly.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct KpiSpec {
    pub name: String,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub higher_is_better: bool,
    pub max_pctdev_threshold: f64,
    pub confidence_threshold: f64,
    pub negligible_threshold: f64,
    pub regression_threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_pct: Option<u32>,
}

impl KpiSpec {
    /// A KPI with the built-in default thresholds.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            from: name.clone(),
            name,
            unit: None,
            higher_is_better: DEFAULT_HIGHER_IS_BETTER,
            max_pctdev_threshold: DEFAULT_MAX_PCTDEV_THRESHOLD,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            negligible_threshold: DEFAULT_NEGLIGIBLE_THRESHOLD,
            regression_threshold: DEFAULT_REGRESSION_THRESHOLD,
            round: None,
            round_pct: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ReportOptions {
    pub round: Option<u32>,
    pub round_pct: Option<u32>,
    pub fillna: String,
    pub abbreviation: bool,
    pub case_conclusion: bool,
    pub case_conclusion_abbr: bool,
    pub report_items: ReportItems,
    pub unresolved_case: UnresolvedCasePolicy,
    pub paired: bool,
    pub primary_metrics: Vec<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            round: None,
            round_pct: None,
            fillna: String::new(),
            abbreviation: false,
            case_conclusion: true,
            case_conclusion_abbr: false,
            report_items: ReportItems::Combined,
            unresolved_case: UnresolvedCasePolicy::InvalidData,
            paired: false,
            primary_metrics: Vec::new(),
        }
    }
}

/// Validated configuration for one report generation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ReportConfig {
    pub keys: Vec<KeySpec>,
    pub kpis: Vec<KpiSpec>,
    pub options: ReportOptions,
}

/// A resolved testrun column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub unit: Option<String>,
    pub round: Option<u32>,
    pub source: ColumnSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestrunConfig {
    pub columns: Vec<ColumnSpec>,
    pub round: Option<u32>,
    pub fillna: String,
    pub split: bool,
}

/// A resolved metadata comparison entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEntry {
    pub name: String,
    pub base_key: String,
    pub test_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataConfig {
    pub show_keys: bool,
    pub show_undefined: bool,
    pub entries: Vec<MetadataEntry>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            show_keys: true,
            show_undefined: true,
            entries: Vec::new(),
        }
    }
}
