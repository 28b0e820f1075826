//! Validation for configuration values.
//!
//! Out-of-range values are rejected, never clamped.

use perfverdict_error::{ConfigError, ConfigSection};
use std::collections::BTreeSet;

/// Largest number of decimals a column may be rounded to.
pub const MAX_ROUND: i64 = 15;

/// Returns the trimmed name, or an error when it is absent or blank.
pub fn validate_name(
    section: ConfigSection,
    index: usize,
    name: Option<&str>,
) -> Result<String, ConfigError> {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => Ok(n.to_string()),
        _ => Err(ConfigError::MissingName { section, index }),
    }
}

pub fn validate_unique<'a>(
    section: ConfigSection,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ConfigError::DuplicateName {
                section,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// A fractional threshold must be finite and `>= 0`.
pub fn validate_non_negative(
    kpi: &str,
    field: &'static str,
    value: f64,
) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::ThresholdOutOfRange {
            kpi: kpi.to_string(),
            field,
            value,
            expected: "a finite value >= 0",
        })
    }
}

/// A probability-like threshold must lie in `[0, 1]`.
pub fn validate_unit_interval(
    kpi: &str,
    field: &'static str,
    value: f64,
) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::ThresholdOutOfRange {
            kpi: kpi.to_string(),
            field,
            value,
            expected: "a value in [0, 1]",
        })
    }
}

pub fn validate_round(column: &str, round: Option<i64>) -> Result<Option<u32>, ConfigError> {
    match round {
        None => Ok(None),
        Some(r) if (0..=MAX_ROUND).contains(&r) => Ok(Some(r as u32)),
        Some(r) => Err(ConfigError::InvalidRound {
            column: column.to_string(),
            value: r,
        }),
    }
}
