//! Default payload validation rules for registration applications.

use crate::application::{
    domain::REGISTRATION_SECTION,
    ports::{PayloadValidationError, PayloadValidationResult, PayloadValidator},
};
use serde_json::Value;

/// Sections a registration payload must carry inside `registration`.
const DEFAULT_REQUIRED_FIELDS: [&str; 2] = ["primaryContact", "unitAddress"];

/// Structural validator for registration application payloads.
///
/// Requires a JSON object with a `registration` object that carries each
/// configured field as a non-null value.
#[derive(Debug, Clone)]
pub struct RegistrationPayloadValidator {
    required_fields: Vec<String>,
}

impl RegistrationPayloadValidator {
    /// Creates a validator with the default required registration fields.
    #[must_use]
    pub fn new() -> Self {
        Self {
            required_fields: DEFAULT_REQUIRED_FIELDS.iter().map(|&field| field.to_owned()).collect(),
        }
    }

    /// Replaces the required registration fields.
    #[must_use]
    pub fn with_required_fields(mut self, fields: impl IntoIterator<Item = String>) -> Self {
        self.required_fields = fields.into_iter().collect();
        self
    }
}

impl Default for RegistrationPayloadValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadValidator for RegistrationPayloadValidator {
    fn validate(&self, payload: &Value) -> PayloadValidationResult<()> {
        let fields = payload.as_object().ok_or(PayloadValidationError::NotAnObject)?;
        let registration = fields
            .get(REGISTRATION_SECTION)
            .and_then(Value::as_object)
            .ok_or_else(|| PayloadValidationError::MissingSection(REGISTRATION_SECTION.to_owned()))?;

        let failures = self
            .required_fields
            .iter()
            .filter(|field| registration.get(field.as_str()).is_none_or(Value::is_null))
            .map(|field| PayloadValidationError::MissingField(format!("{REGISTRATION_SECTION}.{field}")))
            .collect();

        PayloadValidationError::from_failures(failures).map_or(Ok(()), Err)
    }
}
