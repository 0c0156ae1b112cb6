//! Application status enumeration and the subsets derived from it.

use super::{ApplicationDomainError, EventName, ParseApplicationStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a registration application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// Created but not yet invoiced.
    Draft,
    /// Invoice issued, awaiting payment.
    PaymentDue,
    /// Payment completed, awaiting review.
    Paid,
    /// Approved without examiner involvement.
    AutoApproved,
    /// Approved provisionally.
    ProvisionallyApproved,
    /// Approved after a full examiner review.
    FullReviewApproved,
    /// Under provisional review.
    ProvisionalReview,
    /// Examiner asked the applicant for more information.
    AdditionalInfoRequested,
    /// Under full examiner review.
    FullReview,
    /// Declined by an examiner.
    Declined,
    /// Provisional status.
    Provisional,
}

impl ApplicationStatus {
    /// Every status value, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::Draft,
        Self::PaymentDue,
        Self::Paid,
        Self::AutoApproved,
        Self::ProvisionallyApproved,
        Self::FullReviewApproved,
        Self::ProvisionalReview,
        Self::AdditionalInfoRequested,
        Self::FullReview,
        Self::Declined,
        Self::Provisional,
    ];

    /// Statuses from which no further transition is permitted.
    pub const TERMINAL: [Self; 4] = [
        Self::FullReviewApproved,
        Self::ProvisionallyApproved,
        Self::AutoApproved,
        Self::Declined,
    ];

    /// Statuses an examiner may move an application into.
    pub const STAFF_ACTIONABLE: [Self; 4] = [
        Self::FullReviewApproved,
        Self::ProvisionallyApproved,
        Self::Declined,
        Self::AdditionalInfoRequested,
    ];

    /// Statuses for which no payment has completed yet.
    pub const UNPAID: [Self; 2] = [Self::Draft, Self::PaymentDue];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::PaymentDue => "PAYMENT_DUE",
            Self::Paid => "PAID",
            Self::AutoApproved => "AUTO_APPROVED",
            Self::ProvisionallyApproved => "PROVISIONALLY_APPROVED",
            Self::FullReviewApproved => "FULL_REVIEW_APPROVED",
            Self::ProvisionalReview => "PROVISIONAL_REVIEW",
            Self::AdditionalInfoRequested => "ADDITIONAL_INFO_REQUESTED",
            Self::FullReview => "FULL_REVIEW",
            Self::Declined => "DECLINED",
            Self::Provisional => "PROVISIONAL",
        }
    }

    /// Returns `true` when no further transition is permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::FullReviewApproved | Self::ProvisionallyApproved | Self::AutoApproved | Self::Declined
        )
    }

    /// Returns `true` when an examiner may choose this status as a decision.
    #[must_use]
    pub const fn is_staff_actionable(self) -> bool {
        matches!(
            self,
            Self::FullReviewApproved
                | Self::ProvisionallyApproved
                | Self::Declined
                | Self::AdditionalInfoRequested
        )
    }

    /// Returns `true` while the application still awaits payment.
    #[must_use]
    pub const fn is_unpaid(self) -> bool {
        matches!(self, Self::Draft | Self::PaymentDue)
    }

    /// Maps an examiner decision status to the audit event it produces.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::NoDecisionEvent`] for statuses that
    /// have no decision event defined.
    pub const fn decision_event(self) -> Result<EventName, ApplicationDomainError> {
        match self {
            Self::FullReviewApproved => Ok(EventName::ManuallyApproved),
            Self::Declined => Ok(EventName::ManuallyDenied),
            Self::AdditionalInfoRequested => Ok(EventName::MoreInformationRequested),
            Self::Draft
            | Self::PaymentDue
            | Self::Paid
            | Self::AutoApproved
            | Self::ProvisionallyApproved
            | Self::ProvisionalReview
            | Self::FullReview
            | Self::Provisional => Err(ApplicationDomainError::NoDecisionEvent(self)),
        }
    }
}

impl TryFrom<&str> for ApplicationStatus {
    type Error = ParseApplicationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseApplicationStatusError(value.to_owned()))
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationType {
    /// Host registration application.
    Registration,
}

impl ApplicationType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "REGISTRATION",
        }
    }
}

impl TryFrom<&str> for ApplicationType {
    type Error = ApplicationDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "REGISTRATION" => Ok(Self::Registration),
            _ => Err(ApplicationDomainError::UnknownApplicationType(value.to_owned())),
        }
    }
}
