//! Comparison report and benchmark statistics contracts.

use crate::{Conclusion, KeyTuple};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const REPORT_SCHEMA_V1: &str = "perfverdict.report.v1";

/// `NaN` <-> `null` for statistic fields.
pub mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            s.serialize_some(v)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
    }
}

/// Per-(case, KPI) statistics. Indeterminate values are `NaN`.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CaseStatistics {
    #[serde(with = "nan_as_null")]
    #[schemars(with = "Option<f64>")]
    pub base_mean: f64,
    #[serde(with = "nan_as_null")]
    #[schemars(with = "Option<f64>")]
    pub base_pctsd: f64,
    #[serde(with = "nan_as_null")]
    #[schemars(with = "Option<f64>")]
    pub test_mean: f64,
    #[serde(with = "nan_as_null")]
    #[schemars(with = "Option<f64>")]
    pub test_pctsd: f64,
    #[serde(with = "nan_as_null")]
    #[schemars(with = "Option<f64>")]
    pub pct_diff: f64,
    #[serde(with = "nan_as_null")]
    #[schemars(with = "Option<f64>")]
    pub significance: f64,
}

impl CaseStatistics {
    pub fn indeterminate() -> Self {
        Self {
            base_mean: f64::NAN,
            base_pctsd: f64::NAN,
            test_mean: f64::NAN,
            test_pctsd: f64::NAN,
            pct_diff: f64::NAN,
            significance: f64::NAN,
        }
    }
}

/// Statistics and conclusion for one KPI of one case.
///
/// `conclusion == None` means "not applicable" (no %DF could be formed).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KpiOutcome {
    pub kpi: String,
    #[serde(flatten)]
    pub stats: CaseStatistics,
    pub conclusion: Option<Conclusion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportRow {
    pub key: KeyTuple,
    pub kpis: Vec<KpiOutcome>,
    /// Case-level conclusion; absent when case conclusions are disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<Conclusion>,
}

impl ReportRow {
    pub fn kpi(&self, name: &str) -> Option<&KpiOutcome> {
        self.kpis.iter().find(|k| k.kpi == name)
    }
}

/// The full comparison report, sorted by case key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    pub schema: String,
    pub key_names: Vec<String>,
    pub kpi_names: Vec<String>,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum BenchmarkResult {
    Pass,
    Fail,
}

impl BenchmarkResult {
    pub fn as_str(self) -> &'static str {
        match self {
            BenchmarkResult::Pass => "PASS",
            BenchmarkResult::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat benchmark-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BenchmarkStatistics {
    pub case_num_base: Option<usize>,
    pub case_num_test: Option<usize>,
    pub total_case_num: usize,
    pub case_num_invalid_data: usize,
    pub case_num_high_variance: usize,
    pub case_num_no_significance: usize,
    pub case_num_negligible_changes: usize,
    pub case_num_moderate_improvement: usize,
    pub case_num_moderate_regression: usize,
    pub case_num_dramatic_improvement: usize,
    pub case_num_dramatic_regression: usize,
    pub failed_case_num: usize,
    pub failed_case_rate: String,
    pub benchmark_result: BenchmarkResult,
    pub primary_metric: String,
    pub overall_performance: Option<String>,
}

impl BenchmarkStatistics {
    pub fn case_num(&self, conclusion: Conclusion) -> usize {
        match conclusion {
            Conclusion::InvalidData => self.case_num_invalid_data,
            Conclusion::HighVariance => self.case_num_high_variance,
            Conclusion::NoSignificance => self.case_num_no_significance,
            Conclusion::NegligibleChanges => self.case_num_negligible_changes,
            Conclusion::ModerateImprovement => self.case_num_moderate_improvement,
            Conclusion::ModerateRegression => self.case_num_moderate_regression,
            Conclusion::DramaticImprovement => self.case_num_dramatic_improvement,
            Conclusion::DramaticRegression => self.case_num_dramatic_regression,
        }
    }
}
