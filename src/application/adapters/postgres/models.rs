//! Diesel row models for application lifecycle persistence.

use super::schema::{application_events, applications, registrations};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for application records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApplicationRow {
    /// Application identifier.
    pub id: i64,
    /// Applicant-submitted document.
    pub payload: Value,
    /// Application classification.
    pub application_type: String,
    /// Lifecycle status.
    pub status: String,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Decision timestamp.
    pub decided_at: Option<DateTime<Utc>>,
    /// Pay service invoice identifier.
    pub invoice_id: Option<i64>,
    /// Pay service status code.
    pub payment_status_code: Option<String>,
    /// Payment completion timestamp.
    pub payment_completed_at: Option<DateTime<Utc>>,
    /// Billed payment account.
    pub payment_account: String,
    /// Submitting user.
    pub submitter_id: i64,
    /// Deciding examiner.
    pub reviewer_id: Option<i64>,
    /// Provisioned registration.
    pub registration_id: Option<i64>,
    /// Optimistic concurrency version.
    pub version: i64,
}

/// Insert model for application records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub struct NewApplicationRow {
    /// Applicant-submitted document.
    pub payload: Value,
    /// Application classification.
    pub application_type: String,
    /// Initial lifecycle status.
    pub status: String,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Billed payment account.
    pub payment_account: String,
    /// Submitting user.
    pub submitter_id: i64,
    /// Initial version.
    pub version: i64,
}

/// Change set written by lifecycle updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = applications)]
#[diesel(treat_none_as_null = true)]
pub struct ApplicationChangeset {
    /// Lifecycle status.
    pub status: String,
    /// Decision timestamp.
    pub decided_at: Option<DateTime<Utc>>,
    /// Pay service invoice identifier.
    pub invoice_id: Option<i64>,
    /// Pay service status code.
    pub payment_status_code: Option<String>,
    /// Payment completion timestamp.
    pub payment_completed_at: Option<DateTime<Utc>>,
    /// Billed payment account.
    pub payment_account: String,
    /// Deciding examiner.
    pub reviewer_id: Option<i64>,
    /// Provisioned registration.
    pub registration_id: Option<i64>,
    /// Next version.
    pub version: i64,
}

/// Query result row for audit events.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = application_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApplicationEventRow {
    /// Event identifier.
    pub id: i64,
    /// Application the event belongs to.
    pub application_id: i64,
    /// Registration the event refers to.
    pub registration_id: Option<i64>,
    /// Primary entity of the event.
    pub event_type: String,
    /// Milestone name.
    pub event_name: String,
    /// Whether the applicant may see the event.
    pub visible_to_applicant: bool,
    /// Append timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for audit events.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = application_events)]
pub struct NewApplicationEventRow {
    /// Application the event belongs to.
    pub application_id: i64,
    /// Registration the event refers to.
    pub registration_id: Option<i64>,
    /// Primary entity of the event.
    pub event_type: String,
    /// Milestone name.
    pub event_name: String,
    /// Whether the applicant may see the event.
    pub visible_to_applicant: bool,
    /// Append timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for provisioned registrations.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = registrations)]
pub struct NewRegistrationRow {
    /// Pre-allocated registration identifier.
    pub id: i64,
    /// Human-facing registration number.
    pub registration_number: String,
    /// Owning user.
    pub submitter_id: i64,
    /// Payment account of the registration.
    pub payment_account: String,
    /// Registration status.
    pub status: String,
    /// Start of the registration term.
    pub start_date: DateTime<Utc>,
    /// End of the registration term.
    pub expiry_date: DateTime<Utc>,
    /// Registration section of the approved payload.
    pub registration_data: Value,
}

/// Single-column result of `nextval` on the registrations sequence.
#[derive(Debug, Clone, QueryableByName)]
pub struct NextIdRow {
    /// Allocated identifier.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub id: i64,
}

/// Single-column result of a `COUNT(*)` query.
#[derive(Debug, Clone, QueryableByName)]
pub struct CountRow {
    /// Number of matching rows.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub total: i64,
}
