//! Blocking JSON client for the counseling service.
//!
//! Uses a ureq agent with status-as-error disabled so non-2xx replies can
//! be turned into [`ClientError::Status`] with the service's own message.
//! Every reply is decoded into its typed shape and checked before it is
//! handed back; anything that does not fit is an error, never a partially
//! filled value.

use mindcare_core::models::assessment::{AssessmentRequest, AssessmentResponse};
use mindcare_core::models::chat::{ChatRequest, ChatResponse};
use mindcare_core::models::contact::ContactRequest;
use mindcare_core::models::response::{Acknowledgement, RecommendationsResponse};
use mindcare_core::models::session::EndSessionRequest;
use mindcare_core::models::subscale::Subscale;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;

pub struct ApiClient {
    config: ClientConfig,
    agent: ureq::Agent,
}

fn make_agent(config: &ClientConfig) -> ureq::Agent {
    let agent_config = ureq::config::Config::builder()
        .http_status_as_error(false)
        .timeout_global(Some(config.timeout))
        .build();
    ureq::Agent::new_with_config(agent_config)
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent = make_agent(&config);
        Self { config, agent }
    }

    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `POST /assess`: authoritative scores for a validated answer set.
    pub fn assess(&self, request: &AssessmentRequest) -> Result<AssessmentResponse, ClientError> {
        let response: AssessmentResponse = self.post("assess", request)?;
        response.validate()?;
        Ok(response)
    }

    /// `POST /chat`: one counselor reply.
    pub fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let response: ChatResponse = self.post("chat", request)?;
        if !response.success {
            return Err(ClientError::Decode("chat reply reported failure".to_string()));
        }
        Ok(response)
    }

    /// `POST /end-session`: hand the session report to the service.
    pub fn end_session(&self, request: &EndSessionRequest) -> Result<Acknowledgement, ClientError> {
        self.post("end-session", request)
    }

    /// `POST /contact`: landing-page contact form.
    pub fn contact(&self, request: &ContactRequest) -> Result<Acknowledgement, ClientError> {
        self.post("contact", request)
    }

    /// `GET /recommendations/{subscale}`.
    pub fn recommendations(
        &self,
        subscale: Subscale,
    ) -> Result<RecommendationsResponse, ClientError> {
        self.get(&format!("recommendations/{subscale}"))
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");

        let response = self
            .agent
            .post(&url)
            .header("Accept", "application/json")
            .send_json(body)
            .map_err(|e| ClientError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        decode(response)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| ClientError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        decode(response)
    }
}

fn decode<T: DeserializeOwned>(
    response: ureq::http::Response<ureq::Body>,
) -> Result<T, ClientError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let text = body.read_to_string().unwrap_or_default();
        return Err(ClientError::Status {
            status,
            message: error_message(&text),
        });
    }

    body.read_json::<T>()
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// Pull the human-readable message out of an error body. The service uses
/// `{"detail": ...}` for rejected requests and `{"message": ...}` elsewhere.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| v.get(key).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
