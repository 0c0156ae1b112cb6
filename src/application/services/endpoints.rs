//! Boundary operations exposed to the request layer.
//!
//! Each operation performs its role, authorization and not-found checks
//! before any lifecycle mutation runs, so rejected requests have no side
//! effects.

use super::{
    error::{ApplicationLifecycleError, ApplicationLifecycleResult},
    lifecycle::{ApplicationLifecycleService, may_access},
};
use crate::application::{
    domain::{
        AccountId, Application, ApplicationDomainError, ApplicationEvent, ApplicationFilter,
        ApplicationId, ApplicationStatus, CallerContext, InvoiceId, Page, Pagination,
    },
    ports::{ApplicationRepository, EventLog, PaymentGateway, RegistrationProvisioner},
};
use crate::config::QueryConfig;
use mockable::Clock;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// Raw listing and search parameters as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationQuery {
    /// Status name, matched case-insensitively.
    pub status: Option<String>,
    /// Full-text search string (search only).
    pub search_text: Option<String>,
    /// One-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Page size; defaults to the configured limit.
    pub limit: Option<u32>,
}

/// Request-facing operations over the application lifecycle.
#[derive(Clone)]
pub struct ApplicationEndpoints<R, E, G, P, C>
where
    R: ApplicationRepository,
    E: EventLog,
    G: PaymentGateway,
    P: RegistrationProvisioner,
    C: Clock + Send + Sync,
{
    lifecycle: ApplicationLifecycleService<R, E, G, P, C>,
    limits: QueryConfig,
}

impl<R, E, G, P, C> ApplicationEndpoints<R, E, G, P, C>
where
    R: ApplicationRepository,
    E: EventLog,
    G: PaymentGateway,
    P: RegistrationProvisioner,
    C: Clock + Send + Sync,
{
    /// Wraps a lifecycle service with the given query limits.
    #[must_use]
    pub const fn new(lifecycle: ApplicationLifecycleService<R, E, G, P, C>, limits: QueryConfig) -> Self {
        Self { lifecycle, limits }
    }

    /// Returns the wrapped lifecycle service.
    #[must_use]
    pub const fn lifecycle(&self) -> &ApplicationLifecycleService<R, E, G, P, C> {
        &self.lifecycle
    }

    /// Submits a registration application on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationLifecycleError::MissingAccountId`] without an
    /// account, a validation error for a malformed account id, and any error
    /// raised by [`ApplicationLifecycleService::submit`].
    pub async fn submit_application(
        &self,
        caller: &CallerContext,
        account_id: Option<&str>,
        payload: Value,
    ) -> ApplicationLifecycleResult<Application> {
        let raw_account = account_id.ok_or(ApplicationLifecycleError::MissingAccountId)?;
        let account = AccountId::new(raw_account)?;
        self.lifecycle.submit(caller, &account, payload).await
    }

    /// Fetches one application the caller may see.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationLifecycleError::NotFound`] for unknown ids and
    /// [`ApplicationLifecycleError::Unauthorized`] when the caller neither
    /// owns the application nor holds a privileged role.
    pub async fn get_application(
        &self,
        caller: &CallerContext,
        account_id: Option<&AccountId>,
        application_id: ApplicationId,
    ) -> ApplicationLifecycleResult<Application> {
        self.load_authorized(caller, account_id, application_id).await
    }

    /// Lists the caller's applications, or every application for examiners.
    ///
    /// # Errors
    ///
    /// Returns validation errors for an unknown status or invalid paging.
    pub async fn list_applications(
        &self,
        caller: &CallerContext,
        account_id: Option<&AccountId>,
        query: &ApplicationQuery,
    ) -> ApplicationLifecycleResult<Page<Application>> {
        let filter = self.filter_for(query)?;
        let page = self
            .lifecycle
            .repository()
            .find_for_user_and_account(caller.user_id(), account_id, &filter, caller.is_examiner())
            .await?;
        Ok(page)
    }

    /// Full-text search across all applications.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationLifecycleError::Forbidden`] unless the caller is
    /// an examiner or investigator, and
    /// [`ApplicationLifecycleError::SearchTextTooShort`] for search strings
    /// below the configured minimum.
    pub async fn search_applications(
        &self,
        caller: &CallerContext,
        query: &ApplicationQuery,
    ) -> ApplicationLifecycleResult<Page<Application>> {
        if !caller.can_search() {
            return Err(ApplicationLifecycleError::Forbidden(
                "searching applications requires an examiner or investigator role",
            ));
        }
        let search_text = query
            .search_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());
        let mut filter = self.filter_for(query)?;
        if let Some(text) = search_text {
            if text.chars().count() < self.limits.search_min_length {
                return Err(ApplicationLifecycleError::SearchTextTooShort {
                    min: self.limits.search_min_length,
                });
            }
            filter = filter.with_search_text(text);
        }
        let page = self.lifecycle.repository().search(&filter).await?;
        Ok(page)
    }

    /// Re-reads the invoice from the pay service and reconciles it.
    ///
    /// The invoice is looked up on the application's billing account, not
    /// on the account the caller presented.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationLifecycleError::MissingAccountId`] without an
    /// account, not-found and authorization errors from the ownership check,
    /// [`ApplicationLifecycleError::NoInvoice`] for applications that were
    /// never invoiced, and pay service errors.
    pub async fn refresh_payment_details(
        &self,
        caller: &CallerContext,
        account_id: Option<&AccountId>,
        application_id: ApplicationId,
    ) -> ApplicationLifecycleResult<Application> {
        let account = account_id.ok_or(ApplicationLifecycleError::MissingAccountId)?;
        let application = self
            .load_authorized(caller, Some(account), application_id)
            .await?;
        let invoice_id = application
            .invoice_id()
            .ok_or(ApplicationLifecycleError::NoInvoice(application_id))?;
        let invoice = self
            .lifecycle
            .payments()
            .get_invoice_status(application.payment_account(), invoice_id)
            .await?;
        self.lifecycle.reconcile_payment(application, &invoice).await
    }

    /// Handles a pay service callback for an invoice.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationLifecycleError::Forbidden`] unless the caller is
    /// a system actor or examiner,
    /// [`ApplicationLifecycleError::InvoiceNotFound`] when no application is
    /// billed by the invoice, and pay service errors.
    pub async fn reconcile_invoice(
        &self,
        caller: &CallerContext,
        invoice_id: InvoiceId,
    ) -> ApplicationLifecycleResult<Application> {
        if !(caller.is_system() || caller.is_examiner()) {
            return Err(ApplicationLifecycleError::Forbidden(
                "invoice callbacks require a system or examiner role",
            ));
        }
        let application = self
            .lifecycle
            .repository()
            .find_by_invoice_id(invoice_id)
            .await?
            .ok_or(ApplicationLifecycleError::InvoiceNotFound(invoice_id))?;
        let invoice = self
            .lifecycle
            .payments()
            .get_invoice_status(application.payment_account(), invoice_id)
            .await?;
        info!(application_id = %application.id(), invoice_id = %invoice_id, "invoice callback received");
        self.lifecycle.reconcile_payment(application, &invoice).await
    }

    /// Applies an examiner decision.
    ///
    /// The target status is checked before the application is loaded; the
    /// terminal check runs before the lifecycle is invoked.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationLifecycleError::Forbidden`] for non-examiners,
    /// [`ApplicationLifecycleError::InvalidStatus`] for unknown statuses,
    /// domain errors for statuses an examiner cannot choose or terminal
    /// applications, [`ApplicationLifecycleError::NotFound`] for unknown ids,
    /// and any error raised by
    /// [`ApplicationLifecycleService::transition_status`].
    pub async fn update_status(
        &self,
        caller: &CallerContext,
        application_id: ApplicationId,
        status: &str,
    ) -> ApplicationLifecycleResult<Application> {
        if !caller.is_examiner() {
            return Err(ApplicationLifecycleError::Forbidden(
                "changing application status requires an examiner role",
            ));
        }
        let new_status = ApplicationStatus::try_from(status)?;
        if !new_status.is_staff_actionable() {
            return Err(ApplicationDomainError::NotStaffActionable(new_status).into());
        }
        let application = self.find(application_id).await?;
        application.ensure_not_terminal()?;
        self.lifecycle
            .transition_status(application, new_status, caller.user_id())
            .await
    }

    /// Lists the audit trail of an application.
    ///
    /// Examiners see every event; other callers only applicant-visible ones.
    ///
    /// # Errors
    ///
    /// Returns not-found and authorization errors from the ownership check
    /// and event log failures.
    pub async fn list_events(
        &self,
        caller: &CallerContext,
        account_id: Option<&AccountId>,
        application_id: ApplicationId,
    ) -> ApplicationLifecycleResult<Vec<ApplicationEvent>> {
        self.load_authorized(caller, account_id, application_id)
            .await?;
        let events = self
            .lifecycle
            .events()
            .list_for_application(application_id, !caller.is_examiner())
            .await?;
        Ok(events)
    }

    /// Fetches the payment receipt of a paid application.
    ///
    /// # Errors
    ///
    /// Returns not-found and authorization errors from the ownership check,
    /// [`ApplicationLifecycleError::NotPaid`] for unpaid applications and
    /// pay service errors.
    pub async fn payment_receipt(
        &self,
        caller: &CallerContext,
        account_id: Option<&AccountId>,
        application_id: ApplicationId,
    ) -> ApplicationLifecycleResult<Vec<u8>> {
        let application = self
            .load_authorized(caller, account_id, application_id)
            .await?;
        if application.status().is_unpaid() {
            return Err(ApplicationLifecycleError::NotPaid(application_id));
        }
        let invoice_id = application
            .invoice_id()
            .ok_or(ApplicationLifecycleError::NoInvoice(application_id))?;
        let receipt = self
            .lifecycle
            .payments()
            .get_payment_receipt(application.payment_account(), invoice_id)
            .await?;
        Ok(receipt)
    }

    async fn find(&self, application_id: ApplicationId) -> ApplicationLifecycleResult<Application> {
        self.lifecycle
            .repository()
            .find_by_id(application_id)
            .await?
            .ok_or(ApplicationLifecycleError::NotFound(application_id))
    }

    async fn load_authorized(
        &self,
        caller: &CallerContext,
        account_id: Option<&AccountId>,
        application_id: ApplicationId,
    ) -> ApplicationLifecycleResult<Application> {
        let application = self.find(application_id).await?;
        if !may_access(caller, account_id, &application) {
            return Err(ApplicationLifecycleError::Unauthorized {
                user_id: caller.user_id(),
                application_id,
            });
        }
        Ok(application)
    }

    fn filter_for(&self, query: &ApplicationQuery) -> ApplicationLifecycleResult<ApplicationFilter> {
        let pagination = Pagination::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(self.limits.default_page_limit),
            self.limits.max_page_limit,
        )?;
        let status = query
            .status
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(ApplicationStatus::try_from)
            .transpose()?;
        let mut filter = ApplicationFilter::new(pagination);
        if let Some(value) = status {
            filter = filter.with_status(value);
        }
        Ok(filter)
    }
}
