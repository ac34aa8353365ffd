use mindcare_core::models::subscale::{SeverityLevel, Subscale};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Inclusive range of valid values for a single questionnaire answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: i32,
    pub max: i32,
}

impl ScoreRange {
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// One questionnaire item, in canonical order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    /// 0-based position in the answer sequence.
    pub index: usize,
    pub text: String,
    pub subscale: Subscale,
}

/// Lower bounds of the non-Normal severity bands for one subscale.
///
/// Anything below `mild` is Normal. Upper bounds are implied by the next
/// band's lower bound; there is no ceiling on the top band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Thresholds {
    pub mild: i32,
    pub moderate: i32,
    pub severe: i32,
    pub extremely_severe: i32,
}

impl Thresholds {
    /// Highest band whose lower bound `score` meets wins.
    pub fn classify(&self, score: i32) -> SeverityLevel {
        if score >= self.extremely_severe {
            SeverityLevel::ExtremelySevere
        } else if score >= self.severe {
            SeverityLevel::Severe
        } else if score >= self.moderate {
            SeverityLevel::Moderate
        } else if score >= self.mild {
            SeverityLevel::Mild
        } else {
            SeverityLevel::Normal
        }
    }
}

/// A problem with a submitted answer set.
///
/// `position` is `None` when the problem concerns the set as a whole
/// (wrong number of answers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub position: Option<usize>,
    pub value: Option<i32>,
    pub expected_range: ScoreRange,
    pub message: String,
}
