//! Diesel schema for application lifecycle persistence.

diesel::table! {
    /// Registration applications.
    applications (id) {
        /// Store-assigned application identifier.
        id -> Int8,
        /// Applicant-submitted document.
        payload -> Jsonb,
        /// Application classification.
        #[max_length = 50]
        application_type -> Varchar,
        /// Lifecycle status.
        #[max_length = 30]
        status -> Varchar,
        /// Submission timestamp.
        submitted_at -> Timestamptz,
        /// Decision timestamp.
        decided_at -> Nullable<Timestamptz>,
        /// Pay service invoice identifier.
        invoice_id -> Nullable<Int8>,
        /// Pay service status code.
        #[max_length = 50]
        payment_status_code -> Nullable<Varchar>,
        /// Payment completion timestamp.
        payment_completed_at -> Nullable<Timestamptz>,
        /// Billed payment account.
        #[max_length = 30]
        payment_account -> Varchar,
        /// Submitting user.
        submitter_id -> Int8,
        /// Deciding examiner.
        reviewer_id -> Nullable<Int8>,
        /// Provisioned registration.
        registration_id -> Nullable<Int8>,
        /// Optimistic concurrency version.
        version -> Int8,
    }
}

diesel::table! {
    /// Append-only audit trail of application milestones.
    application_events (id) {
        /// Store-assigned event identifier.
        id -> Int8,
        /// Application the event belongs to.
        application_id -> Int8,
        /// Registration the event refers to.
        registration_id -> Nullable<Int8>,
        /// Primary entity of the event.
        #[max_length = 20]
        event_type -> Varchar,
        /// Milestone name.
        #[max_length = 50]
        event_name -> Varchar,
        /// Whether the applicant may see the event.
        visible_to_applicant -> Bool,
        /// Append timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registrations provisioned from approved applications.
    registrations (id) {
        /// Store-assigned registration identifier.
        id -> Int8,
        /// Human-facing registration number.
        #[max_length = 20]
        registration_number -> Varchar,
        /// Owning user.
        submitter_id -> Int8,
        /// Payment account of the registration.
        #[max_length = 30]
        payment_account -> Varchar,
        /// Registration status.
        #[max_length = 20]
        status -> Varchar,
        /// Start of the registration term.
        start_date -> Timestamptz,
        /// End of the registration term.
        expiry_date -> Timestamptz,
        /// Registration section of the approved payload.
        registration_data -> Jsonb,
    }
}

diesel::allow_tables_to_appear_in_same_query!(applications, application_events, registrations);
