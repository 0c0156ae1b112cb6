//! Shared fixtures for in-memory lifecycle integration tests.

use std::sync::Arc;

use eyre::eyre;
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};
use strr::application::{
    adapters::memory::{
        InMemoryApplicationRepository, InMemoryEventLog, InMemoryPaymentGateway,
        InMemoryRegistrationProvisioner,
    },
    domain::{
        AccountId, Application, ApplicationId, ApplicationStatus, CallerContext, CallerRole,
        EventName, UserId,
    },
    ports::{ApplicationRepository, EventLog},
    services::{ApplicationEndpoints, ApplicationLifecycleService},
};
use strr::config::QueryConfig;

/// Boundary operations wired to in-memory adapters.
pub type TestEndpoints = ApplicationEndpoints<
    InMemoryApplicationRepository,
    InMemoryEventLog,
    InMemoryPaymentGateway,
    InMemoryRegistrationProvisioner,
    DefaultClock,
>;

/// Endpoints together with handles on every adapter they use.
pub struct Harness {
    /// Application storage.
    pub repository: Arc<InMemoryApplicationRepository>,
    /// Audit trail.
    pub events: Arc<InMemoryEventLog>,
    /// Programmable pay service.
    pub payments: Arc<InMemoryPaymentGateway>,
    /// Registration store.
    pub provisioner: Arc<InMemoryRegistrationProvisioner>,
    /// Operations under test.
    pub endpoints: TestEndpoints,
}

/// Provides a fresh harness with default query limits.
#[fixture]
pub fn harness() -> Harness {
    let repository = Arc::new(InMemoryApplicationRepository::new());
    let events = Arc::new(InMemoryEventLog::new());
    let payments = Arc::new(InMemoryPaymentGateway::new());
    let provisioner = Arc::new(InMemoryRegistrationProvisioner::new());
    let lifecycle = ApplicationLifecycleService::new(
        Arc::clone(&repository),
        Arc::clone(&events),
        Arc::clone(&payments),
        Arc::clone(&provisioner),
        Arc::new(DefaultClock),
    );
    Harness {
        repository,
        events,
        payments,
        provisioner,
        endpoints: ApplicationEndpoints::new(lifecycle, QueryConfig::default()),
    }
}

/// Account all test applicants bill to unless stated otherwise.
pub const ACCOUNT: &str = "A1";

/// Returns a validated account identifier.
#[must_use]
pub fn account_id(raw: &str) -> AccountId {
    AccountId::new(raw).expect("valid account id")
}

/// Caller without privileged roles.
#[must_use]
pub fn applicant(user_id: i64) -> CallerContext {
    CallerContext::new(UserId::new(user_id))
}

/// Caller holding the examiner role.
#[must_use]
pub fn examiner() -> CallerContext {
    CallerContext::new(UserId::new(900)).with_role(CallerRole::Examiner)
}

/// Platform service account.
#[must_use]
pub fn system_actor() -> CallerContext {
    CallerContext::new(UserId::new(1)).with_role(CallerRole::System)
}

/// Builds a valid registration payload for a unit in `city`.
#[must_use]
pub fn registration_payload(city: &str) -> Value {
    json!({
        "registration": {
            "primaryContact": {"name": {"firstName": "Ada", "lastName": "Lovelace"}},
            "unitAddress": {"city": city, "province": "BC"},
            "unitDetails": {"parcelIdentifier": "000-111-222"}
        }
    })
}

impl Harness {
    /// Submits an application for `caller` on account [`ACCOUNT`].
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails.
    pub async fn submit(&self, caller: &CallerContext, city: &str) -> eyre::Result<Application> {
        Ok(self
            .endpoints
            .submit_application(caller, Some(ACCOUNT), registration_payload(city))
            .await?)
    }

    /// Marks the application's invoice approved and reconciles it.
    ///
    /// # Errors
    ///
    /// Returns an error if the application has no invoice or reconciliation
    /// fails.
    pub async fn pay(&self, application: &Application) -> eyre::Result<Application> {
        let invoice_id = application
            .invoice_id()
            .ok_or_else(|| eyre!("application {} has no invoice", application.id()))?;
        self.payments.set_invoice_status(invoice_id, "APPROVED", None)?;
        Ok(self
            .endpoints
            .reconcile_invoice(&system_actor(), invoice_id)
            .await?)
    }

    /// Overwrites the stored status, standing in for review steps outside
    /// this crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the application cannot be updated.
    pub async fn force_status(
        &self,
        application: &Application,
        status: ApplicationStatus,
    ) -> eyre::Result<Application> {
        let mut data = application.clone().into_persisted();
        data.status = status;
        Ok(self
            .repository
            .update(&Application::from_persisted(data))
            .await?)
    }

    /// Submits, pays and moves an application into `FULL_REVIEW`.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub async fn in_full_review(&self, caller: &CallerContext) -> eyre::Result<Application> {
        let submitted = self.submit(caller, "Victoria").await?;
        let paid = self.pay(&submitted).await?;
        self.force_status(&paid, ApplicationStatus::FullReview).await
    }

    /// Returns the event names logged for an application, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the event log cannot be read.
    pub async fn event_names(&self, application_id: ApplicationId) -> eyre::Result<Vec<EventName>> {
        Ok(self
            .events
            .list_for_application(application_id, false)
            .await?
            .into_iter()
            .map(|event| event.event_name)
            .collect())
    }

    /// Loads the stored application.
    ///
    /// # Errors
    ///
    /// Returns an error if the application is missing.
    pub async fn stored(&self, application_id: ApplicationId) -> eyre::Result<Application> {
        self.repository
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| eyre!("application {application_id} not stored"))
    }
}
