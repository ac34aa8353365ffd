use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::chat::TranscriptEntry;
use super::recommendation::Recommendation;
use super::subscale::SubscaleResults;
use super::user::UserInfo;
use crate::error::CoreError;

/// Body of `POST /end-session`. The service mails the report to the
/// recipient chosen in [`UserInfo::report_to`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EndSessionRequest {
    pub assessment_results: SubscaleResults,
    pub chat_history: Vec<TranscriptEntry>,
    pub user_info: UserInfo,
    pub recommendations: Vec<Recommendation>,
}

impl EndSessionRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.user_info.validate()?;
        self.assessment_results.validate()
    }
}

/// Downloadable JSON snapshot of a finished (or in-progress) session.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionExport {
    pub session_date: jiff::Timestamp,
    /// Elapsed session time as `MM:SS`.
    pub duration: String,
    pub user: Option<UserInfo>,
    pub assessment_results: Option<SubscaleResults>,
    pub chat_history: Vec<TranscriptEntry>,
    pub recommendations: Vec<Recommendation>,
}
