use mindcare_core::models::assessment::AssessmentOutcome;
use mindcare_core::models::chat::{ChatHistoryMessage, ChatRole, ChatTurn, TranscriptEntry};
use mindcare_core::models::recommendation::Recommendation;
use mindcare_core::models::session::SessionExport;
use mindcare_core::models::subscale::SubscaleResults;
use mindcare_core::models::user::UserInfo;
use mindcare_instruments::instruments::dass21::{ANSWER_RANGE, ITEM_COUNT};
use mindcare_instruments::recommend;
use mindcare_instruments::scoring::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClientError;

/// Everything one counseling visit accumulates: who the user is, their
/// questionnaire answers, the scored results and the chat so far.
///
/// Handlers take the session by reference and mutate it explicitly;
/// there is no ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user: Option<UserInfo>,
    /// One slot per questionnaire item; `None` until answered.
    pub answers: Vec<Option<i32>>,
    pub assessment: Option<AssessmentOutcome>,
    pub history: Vec<ChatHistoryMessage>,
    /// Number of messages the user has sent.
    pub message_count: u32,
    pub started_at: jiff::Timestamp,
    pub ended_at: Option<jiff::Timestamp>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            user: None,
            answers: vec![None; ITEM_COUNT],
            assessment: None,
            history: Vec::new(),
            message_count: 0,
            started_at: jiff::Timestamp::now(),
            ended_at: None,
        }
    }

    /// Discard everything and begin a fresh session.
    pub fn reset(&mut self) {
        *self = Session::new();
    }

    /// Record the user's details. Rejects malformed input without touching
    /// the session.
    pub fn start(&mut self, user: UserInfo) -> Result<(), ClientError> {
        user.validate()?;
        self.user = Some(user);
        self.started_at = jiff::Timestamp::now();
        Ok(())
    }

    /// Answer one item. `index` is 0-based.
    pub fn record_answer(&mut self, index: usize, value: i32) -> Result<(), ClientError> {
        self.ensure_open()?;
        if index >= ITEM_COUNT {
            return Err(invalid_answer(
                Some(index),
                Some(value),
                format!("question {} does not exist (1-{ITEM_COUNT})", index + 1),
            ));
        }
        if !ANSWER_RANGE.contains(value) {
            return Err(invalid_answer(
                Some(index),
                Some(value),
                format!(
                    "answer {} is {value}, outside [{}, {}]",
                    index + 1,
                    ANSWER_RANGE.min,
                    ANSWER_RANGE.max
                ),
            ));
        }
        if self.answers.len() < ITEM_COUNT {
            self.answers.resize(ITEM_COUNT, None);
        }
        self.answers[index] = Some(value);
        Ok(())
    }

    /// Replace every answer at once. Values are checked when the
    /// assessment is submitted.
    pub fn set_answers(&mut self, answers: &[i32]) -> Result<(), ClientError> {
        self.ensure_open()?;
        self.answers = answers.iter().copied().map(Some).collect();
        Ok(())
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Answers with gaps read as 0, as the local scorer expects.
    pub fn answer_values(&self) -> Vec<i32> {
        self.answers.iter().map(|a| a.unwrap_or(0)).collect()
    }

    /// Every answer, or a validation error naming the first gap.
    pub fn complete_answers(&self) -> Result<Vec<i32>, ClientError> {
        if self.answers.len() < ITEM_COUNT {
            return Err(invalid_answer(
                None,
                None,
                format!(
                    "expected {ITEM_COUNT} answers, received {}",
                    self.answers.len()
                ),
            ));
        }
        self.answers
            .iter()
            .enumerate()
            .map(|(i, a)| {
                a.ok_or_else(|| {
                    invalid_answer(Some(i), None, format!("answer {} is missing", i + 1))
                })
            })
            .collect()
    }

    pub fn apply_assessment(&mut self, outcome: AssessmentOutcome) {
        self.assessment = Some(outcome);
    }

    pub fn results(&self) -> Option<&SubscaleResults> {
        self.assessment.as_ref().map(|a| &a.results)
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.message_count += 1;
        self.push(ChatRole::User, content.into());
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatRole::Assistant, content.into());
    }

    fn push(&mut self, role: ChatRole, content: String) {
        self.history.push(ChatHistoryMessage {
            role,
            content,
            timestamp: jiff::Timestamp::now(),
        });
    }

    /// History in the shape the chat endpoint expects.
    pub fn chat_turns(&self) -> Vec<ChatTurn> {
        self.history.iter().map(ChatHistoryMessage::to_turn).collect()
    }

    /// History in the shape the end-of-session report expects.
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.history
            .iter()
            .map(ChatHistoryMessage::to_transcript)
            .collect()
    }

    /// Recommendations for the current results; empty before assessment.
    pub fn recommendations(&self) -> Vec<Recommendation> {
        self.results()
            .map(recommend::recommendations)
            .unwrap_or_default()
    }

    pub fn end(&mut self, at: jiff::Timestamp) {
        if self.ended_at.is_none() {
            self.ended_at = Some(at);
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Fails once the session has ended; a new one needs `reset` or `start`.
    pub fn ensure_open(&self) -> Result<(), ClientError> {
        if self.is_ended() {
            return Err(ClientError::SessionEnded);
        }
        Ok(())
    }

    /// Elapsed time as `MM:SS`, measured to the end of the session or to
    /// `now` while it is still open.
    pub fn duration(&self, now: jiff::Timestamp) -> String {
        let until = self.ended_at.unwrap_or(now);
        let secs = until.duration_since(self.started_at).as_secs().max(0);
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn export(&self, now: jiff::Timestamp) -> SessionExport {
        SessionExport {
            session_date: now,
            duration: self.duration(now),
            user: self.user.clone(),
            assessment_results: self.results().copied(),
            chat_history: self.transcript(),
            recommendations: self.recommendations(),
        }
    }
}

fn invalid_answer(position: Option<usize>, value: Option<i32>, message: String) -> ClientError {
    ClientError::Instrument(
        ValidationError {
            position,
            value,
            expected_range: ANSWER_RANGE,
            message,
        }
        .into(),
    )
}
