use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Demographic details collected before the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub gender: String,
    pub department: String,
    pub report_to: ReportTo,
}

/// Who receives the session report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ReportTo {
    Hr,
    Manager,
}

impl fmt::Display for ReportTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportTo::Hr => f.write_str("hr"),
            ReportTo::Manager => f.write_str("manager"),
        }
    }
}

impl FromStr for ReportTo {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hr" => Ok(ReportTo::Hr),
            "manager" => Ok(ReportTo::Manager),
            other => Err(CoreError::invalid(
                "reportTo",
                format!("expected \"hr\" or \"manager\", got \"{other}\""),
            )),
        }
    }
}

impl UserInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.first_name.trim().is_empty() {
            return Err(CoreError::MissingField("firstName".to_string()));
        }
        if self.last_name.trim().is_empty() {
            return Err(CoreError::MissingField("lastName".to_string()));
        }
        validate_email("email", &self.email)?;
        if !(1..=120).contains(&self.age) {
            return Err(CoreError::invalid(
                "age",
                format!("{} is outside [1, 120]", self.age),
            ));
        }
        Ok(())
    }
}

/// Minimal shape check: a non-empty local part and a dotted domain.
pub fn validate_email(field: &str, email: &str) -> Result<(), CoreError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(CoreError::MissingField(field.to_string()));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(CoreError::invalid(field, "missing '@'"));
    };
    let domain_ok = domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
    if local.is_empty() || !domain_ok || domain.contains('@') || email.contains(char::is_whitespace)
    {
        return Err(CoreError::invalid(field, format!("\"{email}\" is not an email address")));
    }
    Ok(())
}
