use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::models::user::validate_email;

/// Landing-page contact form submission.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingField("name".to_string()));
        }
        validate_email("email", &self.email)?;
        if self.message.trim().is_empty() {
            return Err(CoreError::MissingField("message".to_string()));
        }
        Ok(())
    }
}
