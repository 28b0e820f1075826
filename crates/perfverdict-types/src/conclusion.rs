//! The closed conclusion taxonomy.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Classification of a change between BASE and TEST.
///
/// Serialized with its full label; the two-letter code is accepted on input.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum Conclusion {
    #[serde(rename = "Invalid Data", alias = "ID")]
    InvalidData,
    #[serde(rename = "High Variance", alias = "HV")]
    HighVariance,
    #[serde(rename = "No Significance", alias = "NS")]
    NoSignificance,
    #[serde(rename = "Negligible Changes", alias = "NC")]
    NegligibleChanges,
    #[serde(rename = "Moderate Improvement", alias = "MI")]
    ModerateImprovement,
    #[serde(rename = "Moderate Regression", alias = "MR")]
    ModerateRegression,
    #[serde(rename = "Dramatic Improvement", alias = "DI")]
    DramaticImprovement,
    #[serde(rename = "Dramatic Regression", alias = "DR")]
    DramaticRegression,
}

impl Conclusion {
    /// Taxonomy order, used for counting and display.
    pub const ALL: [Conclusion; 8] = [
        Conclusion::InvalidData,
        Conclusion::HighVariance,
        Conclusion::NoSignificance,
        Conclusion::NegligibleChanges,
        Conclusion::ModerateImprovement,
        Conclusion::ModerateRegression,
        Conclusion::DramaticImprovement,
        Conclusion::DramaticRegression,
    ];

    /// Case roll-up priority, most severe first.
    pub const PRIORITY: [Conclusion; 8] = [
        Conclusion::DramaticRegression,
        Conclusion::ModerateRegression,
        Conclusion::HighVariance,
        Conclusion::InvalidData,
        Conclusion::ModerateImprovement,
        Conclusion::DramaticImprovement,
        Conclusion::NegligibleChanges,
        Conclusion::NoSignificance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Conclusion::InvalidData => "Invalid Data",
            Conclusion::HighVariance => "High Variance",
            Conclusion::NoSignificance => "No Significance",
            Conclusion::NegligibleChanges => "Negligible Changes",
            Conclusion::ModerateImprovement => "Moderate Improvement",
            Conclusion::ModerateRegression => "Moderate Regression",
            Conclusion::DramaticImprovement => "Dramatic Improvement",
            Conclusion::DramaticRegression => "Dramatic Regression",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Conclusion::InvalidData => "ID",
            Conclusion::HighVariance => "HV",
            Conclusion::NoSignificance => "NS",
            Conclusion::NegligibleChanges => "NC",
            Conclusion::ModerateImprovement => "MI",
            Conclusion::ModerateRegression => "MR",
            Conclusion::DramaticImprovement => "DI",
            Conclusion::DramaticRegression => "DR",
        }
    }

    /// Text for a report cell.
    pub fn render(self, abbreviate: bool) -> &'static str {
        if abbreviate {
            self.abbreviation()
        } else {
            self.label()
        }
    }

    /// Parse a full label or a two-letter code.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s || c.abbreviation() == s)
    }

    /// Position in [`Conclusion::PRIORITY`]; lower is more severe.
    pub fn priority(self) -> usize {
        match self {
            Conclusion::DramaticRegression => 0,
            Conclusion::ModerateRegression => 1,
            Conclusion::HighVariance => 2,
            Conclusion::InvalidData => 3,
            Conclusion::ModerateImprovement => 4,
            Conclusion::DramaticImprovement => 5,
            Conclusion::NegligibleChanges => 6,
            Conclusion::NoSignificance => 7,
        }
    }

    /// True for the conclusions whose %DF feeds the overall performance.
    pub fn carries_signal(self) -> bool {
        matches!(
            self,
            Conclusion::NegligibleChanges
                | Conclusion::ModerateImprovement
                | Conclusion::ModerateRegression
                | Conclusion::DramaticImprovement
                | Conclusion::DramaticRegression
        )
    }

    pub fn is_regression(self) -> bool {
        matches!(
            self,
            Conclusion::ModerateRegression | Conclusion::DramaticRegression
        )
    }
}

impl std::fmt::Display for Conclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConclusionError(pub String);

impl std::fmt::Display for ParseConclusionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown conclusion: {:?}", self.0)
    }
}

impl std::error::Error for ParseConclusionError {}

impl std::str::FromStr for Conclusion {
    type Err = ParseConclusionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Conclusion::parse(s).ok_or_else(|| ParseConclusionError(s.to_string()))
    }
}
