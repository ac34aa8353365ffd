use thiserror::Error;

use mindcare_core::error::CoreError;
use mindcare_instruments::error::InstrumentError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode service response: {0}")]
    Decode(String),

    #[error("session has no user information; run `start` first")]
    NoUser,

    #[error("session has no assessment results")]
    NoAssessment,

    #[error("session has already ended")]
    SessionEnded,

    #[error("session store error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
