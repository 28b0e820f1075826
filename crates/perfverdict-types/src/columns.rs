//! Column naming of a rendered comparison report.

/// Header of the case-level conclusion column.
pub const CASE_CONCLUSION_COLUMN: &str = "Conclusion";

/// The seven per-KPI columns, in rendered order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KpiColumn {
    BaseAvg,
    BasePctSd,
    TestAvg,
    TestPctSd,
    PctDiff,
    Significance,
    Conclusion,
}

impl KpiColumn {
    pub const ALL: [KpiColumn; 7] = [
        KpiColumn::BaseAvg,
        KpiColumn::BasePctSd,
        KpiColumn::TestAvg,
        KpiColumn::TestPctSd,
        KpiColumn::PctDiff,
        KpiColumn::Significance,
        KpiColumn::Conclusion,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            KpiColumn::BaseAvg => "BASE-AVG",
            KpiColumn::BasePctSd => "BASE-%SD",
            KpiColumn::TestAvg => "TEST-AVG",
            KpiColumn::TestPctSd => "TEST-%SD",
            KpiColumn::PctDiff => "%DF",
            KpiColumn::Significance => "SGN",
            KpiColumn::Conclusion => "CON",
        }
    }

    /// Only the mean columns carry the KPI's unit.
    pub fn carries_unit(self) -> bool {
        matches!(self, KpiColumn::BaseAvg | KpiColumn::TestAvg)
    }

    /// Percentage columns round with `round_pct`.
    pub fn is_percentage(self) -> bool {
        matches!(
            self,
            KpiColumn::BasePctSd | KpiColumn::TestPctSd | KpiColumn::PctDiff
        )
    }

    /// Rendered header, e.g. `IOPS-BASE-AVG(op/s)`.
    pub fn header(self, kpi: &str, unit: Option<&str>) -> String {
        match unit {
            Some(u) if self.carries_unit() && !u.is_empty() => {
                format!("{kpi}-{}({u})", self.suffix())
            }
            _ => format!("{kpi}-{}", self.suffix()),
        }
    }

    /// Split a header into (KPI name, column), ignoring any unit suffix.
    pub fn parse_header(header: &str) -> Option<(&str, KpiColumn)> {
        let bare = strip_unit(header);
        Self::ALL.into_iter().find_map(|col| {
            bare.strip_suffix(col.suffix())
                .and_then(|rest| rest.strip_suffix('-'))
                .filter(|kpi| !kpi.is_empty())
                .map(|kpi| (kpi, col))
        })
    }
}

/// `Name(unit)` for a unit-carrying column, `Name` otherwise.
pub fn with_unit(name: &str, unit: Option<&str>) -> String {
    match unit {
        Some(u) if !u.is_empty() => format!("{name}({u})"),
        _ => name.to_string(),
    }
}

/// Drop a trailing `(unit)` from a rendered header.
pub fn strip_unit(header: &str) -> &str {
    if header.ends_with(')') {
        if let Some(open) = header.rfind('(') {
            return &header[..open];
        }
    }
    header
}
