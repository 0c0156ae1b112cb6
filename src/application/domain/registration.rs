//! Registration data carried in application payloads and provisioned records.

use super::{AccountId, ApplicationDomainError, RegistrationId, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest registration term accepted, in days.
pub const MAX_REGISTRATION_TERM_DAYS: i64 = 36_500;

/// Key of the registration section inside an application payload.
pub const REGISTRATION_SECTION: &str = "registration";

/// Registration section extracted from an approved application payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationData(Value);

impl RegistrationData {
    /// Extracts the registration section from an application payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::MissingRegistrationData`] when the
    /// payload has no object under the `registration` key.
    pub fn from_payload(payload: &Value) -> Result<Self, ApplicationDomainError> {
        payload
            .get(REGISTRATION_SECTION)
            .filter(|section| section.is_object())
            .cloned()
            .map(Self)
            .ok_or(ApplicationDomainError::MissingRegistrationData)
    }

    /// Returns the raw registration document.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Status of a provisioned registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    /// Registration is in force.
    Active,
}

impl RegistrationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
        }
    }
}

/// Registration provisioned from an approved application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Store-assigned identifier.
    pub id: RegistrationId,
    /// Human-facing registration number.
    pub registration_number: String,
    /// Owner of the registration (the application submitter).
    pub submitter_id: UserId,
    /// Payment account the registration belongs to.
    pub payment_account: AccountId,
    /// Registration status.
    pub status: RegistrationStatus,
    /// Start of the registration term.
    pub start_date: DateTime<Utc>,
    /// End of the registration term.
    pub expiry_date: DateTime<Utc>,
}

/// Formats the registration number for a registration identifier.
///
/// Numbers read `H` followed by the two-digit start year and the zero-padded
/// identifier, e.g. `H2400000042`.
#[must_use]
pub fn registration_number(id: RegistrationId, start_date: DateTime<Utc>) -> String {
    let year = start_date.format("%y");
    format!("H{year}{:08}", id.value())
}

/// Returns the end of a `term_days` term starting at `start_date`.
///
/// Returns `None` when the term is not positive or the expiry falls outside
/// the representable date range.
#[must_use]
pub fn registration_expiry(start_date: DateTime<Utc>, term_days: i64) -> Option<DateTime<Utc>> {
    if term_days <= 0 {
        return None;
    }
    Duration::try_days(term_days).and_then(|term| start_date.checked_add_signed(term))
}
