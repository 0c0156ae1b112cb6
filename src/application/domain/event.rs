//! Audit event types appended for application lifecycle milestones.

use super::{ApplicationId, EventId, RegistrationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity an audit event is primarily about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Application lifecycle milestone.
    Application,
    /// Registration lifecycle milestone.
    Registration,
}

impl EventType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Application => "APPLICATION",
            Self::Registration => "REGISTRATION",
        }
    }
}

/// Name of a lifecycle milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventName {
    /// Invoice issued for a draft application.
    ApplicationSubmitted,
    /// Payment for the application completed.
    PaymentComplete,
    /// A registration was provisioned from the application.
    RegistrationCreated,
    /// An examiner approved the application.
    ManuallyApproved,
    /// An examiner declined the application.
    ManuallyDenied,
    /// An examiner asked the applicant for more information.
    MoreInformationRequested,
}

impl EventName {
    /// Every event name, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::ApplicationSubmitted,
        Self::PaymentComplete,
        Self::RegistrationCreated,
        Self::ManuallyApproved,
        Self::ManuallyDenied,
        Self::MoreInformationRequested,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationSubmitted => "APPLICATION_SUBMITTED",
            Self::PaymentComplete => "PAYMENT_COMPLETE",
            Self::RegistrationCreated => "REGISTRATION_CREATED",
            Self::ManuallyApproved => "MANUALLY_APPROVED",
            Self::ManuallyDenied => "MANUALLY_DENIED",
            Self::MoreInformationRequested => "MORE_INFORMATION_REQUESTED",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event about to be appended to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplicationEvent {
    /// Primary entity of the event.
    pub event_type: EventType,
    /// Milestone name.
    pub event_name: EventName,
    /// Application the event belongs to.
    pub application_id: ApplicationId,
    /// Registration the event refers to, if any.
    pub registration_id: Option<RegistrationId>,
    /// Whether the applicant may see this event.
    pub visible_to_applicant: bool,
}

impl NewApplicationEvent {
    /// Creates an applicant-visible application event.
    #[must_use]
    pub const fn application(event_name: EventName, application_id: ApplicationId) -> Self {
        Self {
            event_type: EventType::Application,
            event_name,
            application_id,
            registration_id: None,
            visible_to_applicant: true,
        }
    }

    /// Creates a `REGISTRATION_CREATED` event tagged with the registration.
    #[must_use]
    pub const fn registration_created(
        application_id: ApplicationId,
        registration_id: RegistrationId,
    ) -> Self {
        Self {
            event_type: EventType::Registration,
            event_name: EventName::RegistrationCreated,
            application_id,
            registration_id: Some(registration_id),
            visible_to_applicant: true,
        }
    }

    /// Hides the event from the applicant.
    #[must_use]
    pub const fn hidden_from_applicant(mut self) -> Self {
        self.visible_to_applicant = false;
        self
    }
}

/// Immutable audit record stored by the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    /// Store-assigned identifier.
    pub id: EventId,
    /// Primary entity of the event.
    pub event_type: EventType,
    /// Milestone name.
    pub event_name: EventName,
    /// Application the event belongs to.
    pub application_id: ApplicationId,
    /// Registration the event refers to, if any.
    pub registration_id: Option<RegistrationId>,
    /// Whether the applicant may see this event.
    pub visible_to_applicant: bool,
    /// Append timestamp.
    pub created_at: DateTime<Utc>,
}

impl ApplicationEvent {
    /// Materializes a new event with its store-assigned id and timestamp.
    #[must_use]
    pub const fn from_new(id: EventId, event: NewApplicationEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            event_type: event.event_type,
            event_name: event.event_name,
            application_id: event.application_id,
            registration_id: event.registration_id,
            visible_to_applicant: event.visible_to_applicant,
            created_at,
        }
    }
}

impl TryFrom<&str> for EventType {
    type Error = UnknownEventValue;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "APPLICATION" => Ok(Self::Application),
            "REGISTRATION" => Ok(Self::Registration),
            _ => Err(UnknownEventValue(value.to_owned())),
        }
    }
}

impl TryFrom<&str> for EventName {
    type Error = UnknownEventValue;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == value)
            .ok_or_else(|| UnknownEventValue(value.to_owned()))
    }
}

/// Error returned while parsing persisted event type or name values.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown event value: {0}")]
pub struct UnknownEventValue(pub String);
