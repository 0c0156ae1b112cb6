//! Validator port for applicant-submitted payloads.

use serde_json::Value;
use thiserror::Error;

/// Result type for payload validation.
pub type PayloadValidationResult<T> = Result<T, PayloadValidationError>;

/// Schema validation of application payloads.
///
/// Implementations should collect every failure before returning and be
/// stateless.
pub trait PayloadValidator: Send + Sync {
    /// Validates an application payload.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadValidationError`] describing every failed rule.
    fn validate(&self, payload: &Value) -> PayloadValidationResult<()>;
}

/// Errors raised by payload validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadValidationError {
    /// The payload is not a JSON object.
    #[error("application payload must be a JSON object")]
    NotAnObject,

    /// A required section is absent or not an object.
    #[error("application payload section '{0}' is missing or not an object")]
    MissingSection(String),

    /// A required field inside a section is absent or blank.
    #[error("application payload field '{0}' is required")]
    MissingField(String),

    /// Several rules failed.
    #[error("application payload failed {} validation rules", .0.len())]
    Multiple(Vec<PayloadValidationError>),
}

impl PayloadValidationError {
    /// Collapses collected failures into a single error.
    #[must_use]
    pub fn from_failures(mut failures: Vec<Self>) -> Option<Self> {
        match failures.len() {
            0 => None,
            1 => failures.pop(),
            _ => Some(Self::Multiple(failures)),
        }
    }
}
