//! Configuration loading and resolution for perfverdict.
//!
//! A config file is parsed into [`ConfigFile`], then resolved into the
//! immutable configs the engine consumes. Every range and name check runs
//! during resolution, before any table is read.

use anyhow::Context;
use perfverdict_error::{ConfigError, ConfigSection};
use perfverdict_types::{
    ColumnSource, ColumnSpec, Conclusion, ConfigFile, DEFAULT_CONFIDENCE_THRESHOLD,
    DEFAULT_HIGHER_IS_BETTER, DEFAULT_MAX_PCTDEV_THRESHOLD, DEFAULT_NEGLIGIBLE_THRESHOLD,
    DEFAULT_REGRESSION_THRESHOLD, KeySpec, KpiSpec, MetadataConfig, MetadataEntry, ReportConfig,
    ReportOptions, TestrunConfig,
};
use perfverdict_validation::{
    validate_name, validate_non_negative, validate_round, validate_unique, validate_unit_interval,
};
use std::path::Path;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` selects JSON; anything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

pub fn parse_config(text: &str, format: ConfigFormat) -> perfverdict_error::Result<ConfigFile> {
    let cfg = match format {
        ConfigFormat::Toml => toml::from_str(text)?,
        ConfigFormat::Json => serde_json::from_str(text)?,
    };
    Ok(cfg)
}

pub fn load_config(path: &Path) -> anyhow::Result<ConfigFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    parse_config(&text, ConfigFormat::from_path(path))
        .with_context(|| format!("parse config {}", path.display()))
}

/// Merge `kpi_defaults` into every KPI and validate the result.
pub fn resolve_report_config(file: &ConfigFile) -> Result<ReportConfig, ConfigError> {
    if file.keys.is_empty() {
        return Err(ConfigError::EmptySection(ConfigSection::Keys));
    }
    if file.kpis.is_empty() {
        return Err(ConfigError::EmptySection(ConfigSection::Kpis));
    }

    let mut keys = Vec::with_capacity(file.keys.len());
    for (i, k) in file.keys.iter().enumerate() {
        let name = validate_name(ConfigSection::Keys, i, k.name.as_deref())?;
        keys.push(KeySpec {
            from: k.from.clone().unwrap_or_else(|| name.clone()),
            unit: k.unit.clone(),
            round: validate_round(&name, k.round)?,
            name,
        });
    }
    validate_unique(ConfigSection::Keys, keys.iter().map(|k| k.name.as_str()))?;

    let d = &file.kpi_defaults;
    let mut kpis = Vec::with_capacity(file.kpis.len());
    for (i, k) in file.kpis.iter().enumerate() {
        let name = validate_name(ConfigSection::Kpis, i, k.name.as_deref())?;
        let t = &k.thresholds;

        let max_pctdev = t
            .max_pctdev_threshold
            .or(d.max_pctdev_threshold)
            .unwrap_or(DEFAULT_MAX_PCTDEV_THRESHOLD);
        let confidence = t
            .confidence_threshold
            .or(d.confidence_threshold)
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD);
        let negligible = t
            .negligible_threshold
            .or(d.negligible_threshold)
            .unwrap_or(DEFAULT_NEGLIGIBLE_THRESHOLD);
        let regression = t
            .regression_threshold
            .or(d.regression_threshold)
            .unwrap_or(DEFAULT_REGRESSION_THRESHOLD);

        kpis.push(KpiSpec {
            from: k.from.clone().unwrap_or_else(|| name.clone()),
            unit: k.unit.clone(),
            higher_is_better: t
                .higher_is_better
                .or(d.higher_is_better)
                .unwrap_or(DEFAULT_HIGHER_IS_BETTER),
            max_pctdev_threshold: validate_non_negative(&name, "max_pctdev_threshold", max_pctdev)?,
            confidence_threshold: validate_unit_interval(&name, "confidence_threshold", confidence)?,
            negligible_threshold: validate_non_negative(&name, "negligible_threshold", negligible)?,
            regression_threshold: validate_non_negative(&name, "regression_threshold", regression)?,
            round: validate_round(&name, k.round)?,
            round_pct: validate_round(&name, k.round_pct)?,
            name,
        });
    }
    validate_unique(ConfigSection::Kpis, kpis.iter().map(|k| k.name.as_str()))?;

    let defaults = &file.defaults;
    let primary_metrics = defaults.primary_metrics.clone().unwrap_or_default();
    for m in &primary_metrics {
        if !kpis.iter().any(|k| &k.name == m) {
            return Err(ConfigError::UnknownPrimaryMetric(m.clone()));
        }
    }

    if let Some(fill) = defaults.fillna.as_deref()
        && Conclusion::parse(fill).is_some()
    {
        return Err(ConfigError::FillnaIsConclusion(fill.to_string()));
    }

    let fallback = ReportOptions::default();
    let options = ReportOptions {
        round: validate_round("defaults.round", defaults.round)?,
        round_pct: validate_round("defaults.round_pct", defaults.round_pct)?,
        fillna: defaults.fillna.clone().unwrap_or(fallback.fillna),
        abbreviation: defaults.abbreviation.unwrap_or(fallback.abbreviation),
        case_conclusion: defaults.case_conclusion.unwrap_or(fallback.case_conclusion),
        case_conclusion_abbr: defaults
            .case_conclusion_abbr
            .unwrap_or(fallback.case_conclusion_abbr),
        report_items: defaults.report_items.unwrap_or(fallback.report_items),
        unresolved_case: defaults.unresolved_case.unwrap_or(fallback.unresolved_case),
        paired: defaults.paired.unwrap_or(fallback.paired),
        primary_metrics,
    };

    Ok(ReportConfig {
        keys,
        kpis,
        options,
    })
}

pub fn resolve_testrun_config(file: &ConfigFile) -> Result<TestrunConfig, ConfigError> {
    let testrun = file
        .testrun
        .as_ref()
        .filter(|t| !t.columns.is_empty())
        .ok_or(ConfigError::EmptySection(ConfigSection::Columns))?;

    let mut columns = Vec::with_capacity(testrun.columns.len());
    for (i, c) in testrun.columns.iter().enumerate() {
        let name = validate_name(ConfigSection::Columns, i, c.name.as_deref())?;
        if let ColumnSource::Datastore { pointer, factor } = &c.source {
            if !(pointer.is_empty() || pointer.starts_with('/')) {
                return Err(ConfigError::InvalidEntry {
                    section: ConfigSection::Columns,
                    index: i,
                    message: format!("pointer {pointer:?} must be empty or start with '/'"),
                });
            }
            if factor.is_some_and(|f| !f.is_finite()) {
                return Err(ConfigError::InvalidEntry {
                    section: ConfigSection::Columns,
                    index: i,
                    message: "factor must be a finite number".to_string(),
                });
            }
        }
        columns.push(ColumnSpec {
            unit: c.unit.clone(),
            round: validate_round(&name, c.round)?,
            source: c.source.clone(),
            name,
        });
    }
    validate_unique(ConfigSection::Columns, columns.iter().map(|c| c.name.as_str()))?;

    Ok(TestrunConfig {
        columns,
        round: validate_round("testrun.defaults.round", testrun.defaults.round)?,
        fillna: testrun.defaults.fillna.clone().unwrap_or_default(),
        split: testrun.defaults.split,
    })
}

/// An absent `[metadata]` section means "list every key of both sides".
pub fn resolve_metadata_config(file: &ConfigFile) -> Result<MetadataConfig, ConfigError> {
    let Some(meta) = &file.metadata else {
        return Ok(MetadataConfig::default());
    };

    let mut entries = Vec::with_capacity(meta.entries.len());
    for (i, e) in meta.entries.iter().enumerate() {
        let name = validate_name(ConfigSection::Metadata, i, e.name.as_deref())?;
        let base_key = e.base_key.as_ref().or(e.key.as_ref());
        let test_key = e.test_key.as_ref().or(e.key.as_ref());
        let (Some(base_key), Some(test_key)) = (base_key, test_key) else {
            return Err(ConfigError::InvalidEntry {
                section: ConfigSection::Metadata,
                index: i,
                message: "either \"key\" or both \"base_key\" and \"test_key\" must be given"
                    .to_string(),
            });
        };
        entries.push(MetadataEntry {
            name,
            base_key: base_key.clone(),
            test_key: test_key.clone(),
        });
    }

    Ok(MetadataConfig {
        show_keys: meta.show_keys,
        show_undefined: meta.show_undefined,
        entries,
    })
}
