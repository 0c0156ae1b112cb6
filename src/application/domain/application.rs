//! Application aggregate root and its lifecycle mutations.

use super::{
    AccountId, ApplicationDomainError, ApplicationId, ApplicationStatus, ApplicationType,
    EventName, InvoiceId, PaymentStatus, RegistrationId, UserId, ValidatedInvoice,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::Value;

/// Application aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    id: ApplicationId,
    application_type: ApplicationType,
    payload: Value,
    status: ApplicationStatus,
    submitted_at: DateTime<Utc>,
    decided_at: Option<DateTime<Utc>>,
    invoice_id: Option<InvoiceId>,
    payment_status: Option<PaymentStatus>,
    payment_completed_at: Option<DateTime<Utc>>,
    payment_account: AccountId,
    submitter_id: UserId,
    reviewer_id: Option<UserId>,
    registration_id: Option<RegistrationId>,
    version: i64,
}

/// Application not yet persisted; the store assigns its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    /// Application classification.
    pub application_type: ApplicationType,
    /// Applicant-submitted document.
    pub payload: Value,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Owning user.
    pub submitter_id: UserId,
    /// Payment account the application is billed to.
    pub payment_account: AccountId,
}

impl NewApplication {
    /// Creates a draft registration application for `submitter_id`.
    #[must_use]
    pub fn registration(
        submitter_id: UserId,
        payment_account: AccountId,
        payload: Value,
        clock: &impl Clock,
    ) -> Self {
        Self {
            application_type: ApplicationType::Registration,
            payload,
            submitted_at: clock.utc(),
            submitter_id,
            payment_account,
        }
    }

    /// Materializes the draft with its store-assigned identifier.
    #[must_use]
    pub fn into_application(self, id: ApplicationId) -> Application {
        Application {
            id,
            application_type: self.application_type,
            payload: self.payload,
            status: ApplicationStatus::Draft,
            submitted_at: self.submitted_at,
            decided_at: None,
            invoice_id: None,
            payment_status: None,
            payment_completed_at: None,
            payment_account: self.payment_account,
            submitter_id: self.submitter_id,
            reviewer_id: None,
            registration_id: None,
            version: 0,
        }
    }
}

/// Parameter object for reconstructing a persisted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedApplicationData {
    /// Persisted identifier.
    pub id: ApplicationId,
    /// Persisted classification.
    pub application_type: ApplicationType,
    /// Persisted payload.
    pub payload: Value,
    /// Persisted status.
    pub status: ApplicationStatus,
    /// Persisted submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Persisted decision timestamp.
    pub decided_at: Option<DateTime<Utc>>,
    /// Persisted invoice identifier.
    pub invoice_id: Option<InvoiceId>,
    /// Persisted payment status code.
    pub payment_status: Option<PaymentStatus>,
    /// Persisted payment completion timestamp.
    pub payment_completed_at: Option<DateTime<Utc>>,
    /// Persisted payment account.
    pub payment_account: AccountId,
    /// Persisted submitter.
    pub submitter_id: UserId,
    /// Persisted reviewer.
    pub reviewer_id: Option<UserId>,
    /// Persisted registration reference.
    pub registration_id: Option<RegistrationId>,
    /// Optimistic concurrency version.
    pub version: i64,
}

/// Result of applying invoice details to an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Payment had already completed; nothing changed.
    AlreadyCompleted,
    /// Payment fields were updated.
    Applied {
        /// The draft moved to `PAYMENT_DUE`.
        submitted: bool,
        /// The payment status is now `COMPLETED`.
        payment_completed: bool,
    },
}

impl ReconcileOutcome {
    /// Returns the audit events the outcome produces, in append order.
    #[must_use]
    pub fn events(self) -> Vec<EventName> {
        match self {
            Self::AlreadyCompleted => Vec::new(),
            Self::Applied {
                submitted,
                payment_completed,
            } => [
                (submitted, EventName::ApplicationSubmitted),
                (payment_completed, EventName::PaymentComplete),
            ]
            .into_iter()
            .filter_map(|(fired, name)| fired.then_some(name))
            .collect(),
        }
    }
}

impl Application {
    /// Reconstructs an application from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedApplicationData) -> Self {
        Self {
            id: data.id,
            application_type: data.application_type,
            payload: data.payload,
            status: data.status,
            submitted_at: data.submitted_at,
            decided_at: data.decided_at,
            invoice_id: data.invoice_id,
            payment_status: data.payment_status,
            payment_completed_at: data.payment_completed_at,
            payment_account: data.payment_account,
            submitter_id: data.submitter_id,
            reviewer_id: data.reviewer_id,
            registration_id: data.registration_id,
            version: data.version,
        }
    }

    /// Decomposes the application into its persisted representation.
    #[must_use]
    pub fn into_persisted(self) -> PersistedApplicationData {
        PersistedApplicationData {
            id: self.id,
            application_type: self.application_type,
            payload: self.payload,
            status: self.status,
            submitted_at: self.submitted_at,
            decided_at: self.decided_at,
            invoice_id: self.invoice_id,
            payment_status: self.payment_status,
            payment_completed_at: self.payment_completed_at,
            payment_account: self.payment_account,
            submitter_id: self.submitter_id,
            reviewer_id: self.reviewer_id,
            registration_id: self.registration_id,
            version: self.version,
        }
    }

    /// Returns the application identifier.
    #[must_use]
    pub const fn id(&self) -> ApplicationId {
        self.id
    }

    /// Returns the application classification.
    #[must_use]
    pub const fn application_type(&self) -> ApplicationType {
        self.application_type
    }

    /// Returns the applicant-submitted document.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Returns the submission timestamp.
    #[must_use]
    pub const fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Returns the decision timestamp, set by terminal examiner decisions.
    #[must_use]
    pub const fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    /// Returns the invoice identifier.
    #[must_use]
    pub const fn invoice_id(&self) -> Option<InvoiceId> {
        self.invoice_id
    }

    /// Returns the payment status reported by the pay service.
    #[must_use]
    pub const fn payment_status(&self) -> Option<&PaymentStatus> {
        self.payment_status.as_ref()
    }

    /// Returns the payment completion timestamp.
    #[must_use]
    pub const fn payment_completed_at(&self) -> Option<DateTime<Utc>> {
        self.payment_completed_at
    }

    /// Returns the payment account.
    #[must_use]
    pub const fn payment_account(&self) -> &AccountId {
        &self.payment_account
    }

    /// Returns the submitting user.
    #[must_use]
    pub const fn submitter_id(&self) -> UserId {
        self.submitter_id
    }

    /// Returns the examiner who decided the application.
    #[must_use]
    pub const fn reviewer_id(&self) -> Option<UserId> {
        self.reviewer_id
    }

    /// Returns the provisioned registration reference.
    #[must_use]
    pub const fn registration_id(&self) -> Option<RegistrationId> {
        self.registration_id
    }

    /// Returns the optimistic concurrency version.
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    /// Returns `true` once payment has completed.
    #[must_use]
    pub fn is_payment_completed(&self) -> bool {
        self.payment_status
            .as_ref()
            .is_some_and(PaymentStatus::is_completed)
    }

    /// Returns `true` when `user_id` submitted the application on `account_id`.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId, account_id: Option<&AccountId>) -> bool {
        self.submitter_id == user_id && account_id == Some(&self.payment_account)
    }

    /// Rejects any mutation once the application reached a terminal status.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::TerminalState`] for terminal
    /// applications.
    pub const fn ensure_not_terminal(&self) -> Result<(), ApplicationDomainError> {
        if self.status.is_terminal() {
            return Err(ApplicationDomainError::TerminalState {
                application_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Applies invoice details reported by the pay service.
    ///
    /// A completed payment is never reprocessed. A terminal application keeps
    /// its status; only the payment fields are recorded.
    pub fn reconcile_invoice(
        &mut self,
        invoice: ValidatedInvoice,
        clock: &impl Clock,
    ) -> ReconcileOutcome {
        if self.is_payment_completed() {
            return ReconcileOutcome::AlreadyCompleted;
        }

        self.invoice_id = Some(invoice.invoice_id);
        self.payment_account = invoice.account_id;

        let mut submitted = false;
        let status = if self.status == ApplicationStatus::Draft
            && invoice.status == PaymentStatus::Created
        {
            self.status = ApplicationStatus::PaymentDue;
            submitted = true;
            invoice.status
        } else {
            match invoice.status {
                PaymentStatus::Completed => {
                    self.mark_paid(invoice.payment_date.unwrap_or_else(|| clock.utc()));
                    PaymentStatus::Completed
                }
                PaymentStatus::Approved => {
                    self.mark_paid(clock.utc());
                    PaymentStatus::Completed
                }
                other @ (PaymentStatus::Created | PaymentStatus::Other(_)) => other,
            }
        };
        self.payment_status = Some(status);

        ReconcileOutcome::Applied {
            submitted,
            payment_completed: self.is_payment_completed(),
        }
    }

    fn mark_paid(&mut self, completed_at: DateTime<Utc>) {
        if !self.status.is_terminal() {
            self.status = ApplicationStatus::Paid;
        }
        self.payment_completed_at = Some(completed_at);
    }

    /// Records an examiner decision.
    ///
    /// Approval into `FULL_REVIEW_APPROVED` must carry the provisioned
    /// registration. Terminal decisions stamp the decision time and reviewer.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::TerminalState`] if the application is
    /// already terminal, [`ApplicationDomainError::NotStaffActionable`] for
    /// statuses an examiner cannot choose, and
    /// [`ApplicationDomainError::MissingRegistration`] when approving without
    /// a registration.
    pub fn apply_staff_decision(
        &mut self,
        status: ApplicationStatus,
        reviewer_id: UserId,
        registration_id: Option<RegistrationId>,
        clock: &impl Clock,
    ) -> Result<(), ApplicationDomainError> {
        self.ensure_not_terminal()?;
        if !status.is_staff_actionable() {
            return Err(ApplicationDomainError::NotStaffActionable(status));
        }
        if status == ApplicationStatus::FullReviewApproved {
            let registration = registration_id.ok_or(ApplicationDomainError::MissingRegistration(self.id))?;
            self.registration_id = Some(registration);
        }

        self.status = status;
        if status.is_terminal() {
            self.decided_at = Some(clock.utc());
            self.reviewer_id = Some(reviewer_id);
        }
        Ok(())
    }
}
