//! Session flows that talk to the counseling service.
//!
//! The service is the authority for scores; when it cannot be reached or
//! answers with something unusable, the assessment is scored locally with
//! the same rules so the session can continue.

use mindcare_core::models::assessment::{AssessmentOutcome, AssessmentRequest, ResultSource};
use mindcare_core::models::chat::{ChatRequest, ChatResponse};
use mindcare_core::models::contact::ContactRequest;
use mindcare_core::models::recommendation::Recommendation;
use mindcare_core::models::response::Acknowledgement;
use mindcare_core::models::session::EndSessionRequest;
use mindcare_core::models::subscale::Subscale;
use mindcare_instruments::instruments::dass21::{compute_scores, Dass21};
use mindcare_instruments::recommend;
use mindcare_instruments::Instrument;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::session::Session;

/// Result of closing a session.
#[derive(Debug, Clone)]
pub struct EndSessionOutcome {
    /// Whether the service accepted the session report.
    pub delivered: bool,
    pub recommendations: Vec<Recommendation>,
}

/// Score the session's answers, remotely if possible.
///
/// The user and the answer set are checked strictly first; an incomplete
/// or out-of-range assessment is rejected without contacting the service.
pub fn submit_assessment(
    api: &ApiClient,
    session: &mut Session,
) -> Result<AssessmentOutcome, ClientError> {
    session.ensure_open()?;
    let user = session.user.clone().ok_or(ClientError::NoUser)?;
    user.validate()?;
    let answers = session.complete_answers()?;
    Dass21.check_answers(&answers)?;

    let request = AssessmentRequest {
        answers,
        user_info: user,
    };

    let outcome = match api.assess(&request) {
        Ok(response) => AssessmentOutcome {
            results: response.results,
            severe_case_detected: response.severe_case_detected,
            source: ResultSource::Remote,
            completed_at: jiff::Timestamp::now(),
        },
        Err(e) => {
            warn!(error = %e, "assessment service unavailable, scoring locally");
            let results = compute_scores(&request.answers);
            AssessmentOutcome {
                severe_case_detected: results.any_severe(),
                results,
                source: ResultSource::Local,
                completed_at: jiff::Timestamp::now(),
            }
        }
    };

    info!(
        session_id = %session.id,
        source = ?outcome.source,
        depression = outcome.results.depression.score,
        anxiety = outcome.results.anxiety.score,
        stress = outcome.results.stress.score,
        "assessment scored"
    );
    if outcome.severe_case_detected {
        warn!(session_id = %session.id, "severe case detected");
    }

    session.apply_assessment(outcome.clone());
    Ok(outcome)
}

/// Send one user message and record the counselor's reply.
///
/// The user's message stays in the history even if the service fails; no
/// reply is invented in that case.
pub fn send_chat(
    api: &ApiClient,
    session: &mut Session,
    message: &str,
) -> Result<ChatResponse, ClientError> {
    session.ensure_open()?;

    let request = ChatRequest {
        message: message.trim().to_string(),
        assessment_results: session.results().copied(),
        session_history: session.chat_turns(),
    };
    request.validate()?;

    session.push_user(request.message.clone());
    let response = api.chat(&request)?;
    session.push_assistant(response.response.clone());

    if response.should_end_session {
        info!(session_id = %session.id, "counselor ended the session");
    }
    Ok(response)
}

/// Close the session and send its report.
///
/// The session is marked ended whether or not the report reaches the
/// service; [`EndSessionOutcome::delivered`] says which. An ended session
/// is never reported again.
pub fn end_session(
    api: &ApiClient,
    session: &mut Session,
) -> Result<EndSessionOutcome, ClientError> {
    session.ensure_open()?;
    let user = session.user.clone().ok_or(ClientError::NoUser)?;
    let results = *session.results().ok_or(ClientError::NoAssessment)?;
    let recommendations = session.recommendations();

    let request = EndSessionRequest {
        assessment_results: results,
        chat_history: session.transcript(),
        user_info: user,
        recommendations: recommendations.clone(),
    };
    request.validate()?;

    let delivered = match api.end_session(&request) {
        Ok(ack) => ack.success,
        Err(e) => {
            warn!(error = %e, "session report could not be sent");
            false
        }
    };

    session.end(jiff::Timestamp::now());
    info!(session_id = %session.id, delivered, "session ended");

    Ok(EndSessionOutcome {
        delivered,
        recommendations,
    })
}

/// Submit the contact form.
pub fn submit_contact(
    api: &ApiClient,
    request: &ContactRequest,
) -> Result<Acknowledgement, ClientError> {
    request.validate()?;
    api.contact(request)
}

/// Recommendations for one subscale, from the service or, failing that,
/// the built-in list.
pub fn subscale_recommendations(api: &ApiClient, subscale: Subscale) -> Vec<Recommendation> {
    match api.recommendations(subscale) {
        Ok(response) if response.success && !response.recommendations.is_empty() => {
            response.recommendations
        }
        Ok(_) => recommend::subscale_recommendations(subscale),
        Err(e) => {
            warn!(error = %e, %subscale, "recommendations unavailable, using built-in list");
            recommend::subscale_recommendations(subscale)
        }
    }
}
