use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::subscale::SubscaleResults;
use super::user::UserInfo;
use crate::error::CoreError;

/// Body of `POST /assess`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AssessmentRequest {
    pub answers: Vec<i32>,
    pub user_info: UserInfo,
}

/// Reply of `POST /assess`. The service's scores are authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AssessmentResponse {
    pub success: bool,
    pub results: SubscaleResults,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
    pub severe_case_detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl AssessmentResponse {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.success {
            return Err(CoreError::invalid("success", "service reported failure"));
        }
        self.results.validate()
    }
}

/// Where a set of results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResultSource {
    /// Scored by the counseling service.
    Remote,
    /// Scored on this machine because the service was unreachable or
    /// returned an unusable reply.
    Local,
}

/// Outcome of one assessment submission, as kept in the session.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AssessmentOutcome {
    pub results: SubscaleResults,
    pub severe_case_detected: bool,
    pub source: ResultSource,
    pub completed_at: jiff::Timestamp,
}
