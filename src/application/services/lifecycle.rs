//! Application lifecycle orchestration: submission, payment reconciliation,
//! examiner decisions and ownership checks.

use super::error::ApplicationLifecycleResult;
use crate::application::{
    domain::{
        AccountId, Application, ApplicationDomainError, ApplicationId, ApplicationStatus,
        CallerContext, InvoiceDetails, NewApplication, NewApplicationEvent, Registration,
        RegistrationData, UserId,
    },
    ports::{ApplicationRepository, EventLog, PayloadValidator, PaymentGateway, RegistrationProvisioner},
    validation::RegistrationPayloadValidator,
};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Core state machine for registration applications.
///
/// Persisted state is committed before the matching audit event is appended.
/// Event append is best-effort: a failed append is logged and the operation
/// still succeeds.
#[derive(Clone)]
pub struct ApplicationLifecycleService<R, E, G, P, C>
where
    R: ApplicationRepository,
    E: EventLog,
    G: PaymentGateway,
    P: RegistrationProvisioner,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    events: Arc<E>,
    payments: Arc<G>,
    provisioner: Arc<P>,
    validator: Arc<dyn PayloadValidator>,
    clock: Arc<C>,
}

impl<R, E, G, P, C> ApplicationLifecycleService<R, E, G, P, C>
where
    R: ApplicationRepository,
    E: EventLog,
    G: PaymentGateway,
    P: RegistrationProvisioner,
    C: Clock + Send + Sync,
{
    /// Creates a lifecycle service validating payloads with
    /// [`RegistrationPayloadValidator`].
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        events: Arc<E>,
        payments: Arc<G>,
        provisioner: Arc<P>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            events,
            payments,
            provisioner,
            validator: Arc::new(RegistrationPayloadValidator::new()),
            clock,
        }
    }

    /// Replaces the payload validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn PayloadValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub(super) fn repository(&self) -> &R {
        &self.repository
    }

    pub(super) fn events(&self) -> &E {
        &self.events
    }

    pub(super) fn payments(&self) -> &G {
        &self.payments
    }

    /// Submits a new registration application billed to `account_id`.
    ///
    /// The draft is persisted before the invoice is requested, so a pay
    /// service failure leaves a `DRAFT` application behind for the caller to
    /// retry.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApplicationLifecycleError::Payload`] when the payload
    /// fails validation, [`super::ApplicationLifecycleError::Payment`] when
    /// invoice creation fails, and repository errors from persistence.
    pub async fn submit(
        &self,
        caller: &CallerContext,
        account_id: &AccountId,
        payload: Value,
    ) -> ApplicationLifecycleResult<Application> {
        self.validator.validate(&payload)?;

        let draft = NewApplication::registration(
            caller.user_id(),
            account_id.clone(),
            payload,
            &*self.clock,
        );
        let application = self.repository.create(&draft).await?;
        info!(
            application_id = %application.id(),
            submitter_id = %application.submitter_id(),
            "application draft created"
        );

        let invoice = self
            .payments
            .create_invoice(account_id, &application)
            .await
            .inspect_err(|err| {
                warn!(
                    application_id = %application.id(),
                    error = %err,
                    "invoice creation failed; draft retained"
                );
            })?;

        self.reconcile_payment(application, &invoice).await
    }

    /// Applies invoice details reported by the pay service.
    ///
    /// Returns the application unchanged, without touching storage or the
    /// event log, once its payment has completed.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApplicationLifecycleError::Invoice`] when the invoice
    /// details lack required fields, and repository errors from persistence.
    pub async fn reconcile_payment(
        &self,
        mut application: Application,
        invoice: &InvoiceDetails,
    ) -> ApplicationLifecycleResult<Application> {
        if application.is_payment_completed() {
            debug!(application_id = %application.id(), "payment already completed");
            return Ok(application);
        }

        let validated = invoice.validate()?;
        let outcome = application.reconcile_invoice(validated, &*self.clock);

        let stored = self.repository.update(&application).await?;
        info!(
            application_id = %stored.id(),
            status = %stored.status(),
            payment_status = ?stored.payment_status(),
            "payment reconciled"
        );
        for event_name in outcome.events() {
            self.append_event(NewApplicationEvent::application(event_name, stored.id()))
                .await;
        }
        Ok(stored)
    }

    /// Records an examiner decision on a non-terminal application.
    ///
    /// Approval into `FULL_REVIEW_APPROVED` provisions a registration before
    /// the application is changed; if provisioning fails, nothing is
    /// persisted and no event is appended.
    ///
    /// # Errors
    ///
    /// Returns [`super::ApplicationLifecycleError::Domain`] when the
    /// application is terminal, the status is not an examiner decision or no
    /// decision event exists for it,
    /// [`super::ApplicationLifecycleError::Provisioning`] when registration
    /// creation fails, and repository errors from persistence.
    pub async fn transition_status(
        &self,
        mut application: Application,
        new_status: ApplicationStatus,
        reviewer_id: UserId,
    ) -> ApplicationLifecycleResult<Application> {
        application.ensure_not_terminal()?;
        if !new_status.is_staff_actionable() {
            return Err(ApplicationDomainError::NotStaffActionable(new_status).into());
        }
        let decision_event = new_status.decision_event()?;

        let registration = if new_status == ApplicationStatus::FullReviewApproved {
            Some(self.provision_registration(&application).await?)
        } else {
            None
        };

        application.apply_staff_decision(
            new_status,
            reviewer_id,
            registration.as_ref().map(|created| created.id),
            &*self.clock,
        )?;
        let stored = self.repository.update(&application).await?;
        info!(
            application_id = %stored.id(),
            status = %stored.status(),
            reviewer_id = %reviewer_id,
            "application status changed"
        );

        if let Some(created) = registration {
            self.append_event(NewApplicationEvent::registration_created(stored.id(), created.id))
                .await;
        }
        self.append_event(NewApplicationEvent::application(decision_event, stored.id()))
            .await;
        Ok(stored)
    }

    /// Decides whether `caller` may act on an application.
    ///
    /// Examiners and system actors always may. Anyone else must have
    /// submitted the application on `account_id`; a missing application or
    /// account yields `false`.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the lookup.
    pub async fn authorize(
        &self,
        caller: &CallerContext,
        account_id: Option<&AccountId>,
        application_id: ApplicationId,
    ) -> ApplicationLifecycleResult<bool> {
        if is_privileged(caller) {
            return Ok(true);
        }
        if account_id.is_none() {
            return Ok(false);
        }
        let application = self.repository.find_by_id(application_id).await?;
        Ok(application.is_some_and(|found| may_access(caller, account_id, &found)))
    }

    async fn provision_registration(
        &self,
        application: &Application,
    ) -> ApplicationLifecycleResult<Registration> {
        let data = RegistrationData::from_payload(application.payload())?;
        let registration = self
            .provisioner
            .create(application.submitter_id(), application.payment_account(), &data)
            .await
            .inspect_err(|err| {
                warn!(
                    application_id = %application.id(),
                    error = %err,
                    "registration provisioning failed"
                );
            })?;
        info!(
            application_id = %application.id(),
            registration_id = %registration.id,
            registration_number = %registration.registration_number,
            "registration provisioned"
        );
        Ok(registration)
    }

    async fn append_event(&self, event: NewApplicationEvent) {
        if let Err(err) = self.events.append(&event).await {
            warn!(
                application_id = %event.application_id,
                event_name = %event.event_name,
                error = %err,
                "failed to append application event"
            );
        }
    }
}

/// Returns `true` for callers that bypass ownership checks.
fn is_privileged(caller: &CallerContext) -> bool {
    caller.is_examiner() || caller.is_system()
}

/// Ownership rule shared by [`ApplicationLifecycleService::authorize`] and
/// the boundary operations that already hold the application.
pub(super) fn may_access(
    caller: &CallerContext,
    account_id: Option<&AccountId>,
    application: &Application,
) -> bool {
    is_privileged(caller) || application.is_owned_by(caller.user_id(), account_id)
}
