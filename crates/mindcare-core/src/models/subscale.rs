use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Highest subscale score a complete, in-range answer set can produce.
pub const MAX_SUBSCALE_SCORE: i32 = 42;

/// One of the three independent severity dimensions of the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Subscale {
    Depression,
    Anxiety,
    Stress,
}

impl Subscale {
    pub const ALL: [Subscale; 3] = [Subscale::Depression, Subscale::Anxiety, Subscale::Stress];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subscale::Depression => "depression",
            Subscale::Anxiety => "anxiety",
            Subscale::Stress => "stress",
        }
    }

    /// Capitalized label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Subscale::Depression => "Depression",
            Subscale::Anxiety => "Anxiety",
            Subscale::Stress => "Stress",
        }
    }
}

impl fmt::Display for Subscale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subscale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "depression" => Ok(Subscale::Depression),
            "anxiety" => Ok(Subscale::Anxiety),
            "stress" => Ok(Subscale::Stress),
            other => Err(CoreError::UnknownSubscale(other.to_string())),
        }
    }
}

/// Categorical severity derived from a subscale score.
///
/// Variants are ordered from least to most severe, so `Ord` compares
/// severity directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SeverityLevel {
    Normal,
    Mild,
    Moderate,
    Severe,
    #[serde(rename = "Extremely Severe")]
    ExtremelySevere,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Normal => "Normal",
            SeverityLevel::Mild => "Mild",
            SeverityLevel::Moderate => "Moderate",
            SeverityLevel::Severe => "Severe",
            SeverityLevel::ExtremelySevere => "Extremely Severe",
        }
    }

    /// Severe and Extremely Severe both count as a severe case.
    pub fn is_severe(&self) -> bool {
        matches!(self, SeverityLevel::Severe | SeverityLevel::ExtremelySevere)
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and severity for a single subscale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscaleResult {
    pub score: i32,
    pub level: SeverityLevel,
}

/// Results for all three subscales. Produced fresh per assessment and never
/// mutated afterwards.
///
/// Both the remote service and the local calculator emit this exact shape,
/// so callers can substitute one for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscaleResults {
    pub depression: SubscaleResult,
    pub anxiety: SubscaleResult,
    pub stress: SubscaleResult,
}

impl SubscaleResults {
    pub fn get(&self, subscale: Subscale) -> &SubscaleResult {
        match subscale {
            Subscale::Depression => &self.depression,
            Subscale::Anxiety => &self.anxiety,
            Subscale::Stress => &self.stress,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subscale, &SubscaleResult)> {
        Subscale::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// True when any subscale lands in a severe band.
    pub fn any_severe(&self) -> bool {
        self.iter().any(|(_, r)| r.level.is_severe())
    }

    pub fn max_score(&self) -> i32 {
        self.iter().map(|(_, r)| r.score).max().unwrap_or_default()
    }

    /// Check that every score lies in the range a well-formed assessment
    /// can produce. Used to reject malformed service responses.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (subscale, result) in self.iter() {
            if !(0..=MAX_SUBSCALE_SCORE).contains(&result.score) {
                return Err(CoreError::invalid(
                    &format!("results.{subscale}.score"),
                    format!("{} is outside [0, {MAX_SUBSCALE_SCORE}]", result.score),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for SubscaleResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(s, r)| format!("{}: {} ({})", s.label(), r.score, r.level))
            .collect();
        f.write_str(&parts.join(", "))
    }
}
