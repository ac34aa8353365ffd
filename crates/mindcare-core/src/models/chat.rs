use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::recommendation::Recommendation;
use super::subscale::SubscaleResults;
use crate::error::CoreError;

/// Role of a message in the history sent to the counseling model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One prior turn, in the `sessionHistory` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Author of a transcript entry, in the end-of-session report shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Sender {
    User,
    Bot,
}

impl From<ChatRole> for Sender {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::User => Sender::User,
            ChatRole::Assistant => Sender::Bot,
        }
    }
}

/// A timestamped transcript line sent with the end-of-session report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TranscriptEntry {
    pub sender: Sender,
    pub message: String,
    pub timestamp: jiff::Timestamp,
}

/// A single message as kept in the client's session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatHistoryMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: jiff::Timestamp,
}

impl ChatHistoryMessage {
    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }

    pub fn to_transcript(&self) -> TranscriptEntry {
        TranscriptEntry {
            sender: self.role.into(),
            message: self.content.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_results: Option<SubscaleResults>,
    #[serde(default)]
    pub session_history: Vec<ChatTurn>,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.message.trim().is_empty() {
            return Err(CoreError::MissingField("message".to_string()));
        }
        Ok(())
    }
}

/// Reply of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    #[serde(default)]
    pub should_end_session: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
