//! Error types for application domain validation and parsing.

use super::{ApplicationId, ApplicationStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating application domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplicationDomainError {
    /// The payment account identifier is blank or too long.
    #[error("invalid account id '{0}', expected 1-30 characters")]
    InvalidAccountId(String),

    /// The application type value is unsupported.
    #[error("unsupported application type: {0}")]
    UnknownApplicationType(String),

    /// Pages are numbered from one.
    #[error("invalid page {0}, expected a positive integer")]
    InvalidPage(u32),

    /// The page size is zero or above the configured maximum.
    #[error("invalid page limit {limit}, expected 1..={max}")]
    InvalidLimit {
        /// Requested page size.
        limit: u32,
        /// Largest accepted page size.
        max: u32,
    },

    /// The application already reached a terminal status.
    #[error("application {application_id} is in terminal status {status}")]
    TerminalState {
        /// Application identifier.
        application_id: ApplicationId,
        /// Current terminal status.
        status: ApplicationStatus,
    },

    /// The requested status is not an examiner decision.
    #[error("status {0} cannot be set by an examiner")]
    NotStaffActionable(ApplicationStatus),

    /// No audit event is defined for an examiner decision into this status.
    #[error("no decision event is defined for status {0}")]
    NoDecisionEvent(ApplicationStatus),

    /// Approval into full-review-approved requires a provisioned registration.
    #[error("application {0} cannot be approved without a provisioned registration")]
    MissingRegistration(ApplicationId),

    /// The payload does not carry a registration section.
    #[error("application payload has no registration section")]
    MissingRegistrationData,
}

/// Error returned while parsing application statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown application status: {0}")]
pub struct ParseApplicationStatusError(pub String);
