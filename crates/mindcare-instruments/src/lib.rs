//! mindcare-instruments
//!
//! Questionnaire definitions and scoring rules. Pure data and pure
//! functions with no I/O. The DASS-21 scorer doubles as the client-side
//! fallback when the counseling service cannot score an assessment.

pub mod error;
pub mod instruments;
pub mod recommend;
pub mod scoring;

use error::InstrumentError;
use scoring::{Item, ScoreRange, ValidationError};

/// Trait implemented by each self-assessment questionnaire.
pub trait Instrument: Send + Sync {
    /// Unique identifier for this instrument (e.g., "dass21").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "DASS-21").
    fn name(&self) -> &str;

    /// Items in canonical answer order.
    fn items(&self) -> &[Item];

    /// Valid range for every answer.
    fn item_range(&self) -> ScoreRange;

    /// Check an answer set strictly: one answer per item, each in range.
    fn validate_answers(&self, answers: &[i32]) -> Vec<ValidationError> {
        let range = self.item_range();
        let expected = self.items().len();

        let mut errors = Vec::new();
        if answers.len() != expected {
            errors.push(ValidationError {
                position: None,
                value: None,
                expected_range: range,
                message: format!(
                    "{}: expected {expected} answers, received {}",
                    self.name(),
                    answers.len()
                ),
            });
        }
        for (position, &value) in answers.iter().enumerate() {
            if !range.contains(value) {
                errors.push(ValidationError {
                    position: Some(position),
                    value: Some(value),
                    expected_range: range,
                    message: format!(
                        "{}: answer {} is {value}, outside [{}, {}]",
                        self.name(),
                        position + 1,
                        range.min,
                        range.max,
                    ),
                });
            }
        }
        errors
    }

    /// Like [`Instrument::validate_answers`], failing on the first problem.
    fn check_answers(&self, answers: &[i32]) -> Result<(), InstrumentError> {
        match self.validate_answers(answers).into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![Box::new(instruments::dass21::Dass21)]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Result<Box<dyn Instrument>, InstrumentError> {
    all_instruments()
        .into_iter()
        .find(|i| i.id() == id)
        .ok_or_else(|| InstrumentError::UnknownInstrument(id.to_string()))
}
