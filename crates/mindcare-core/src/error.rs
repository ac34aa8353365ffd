use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("unknown subscale: {0}")]
    UnknownSubscale(String),
}

impl CoreError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
