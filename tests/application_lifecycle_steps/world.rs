//! Shared world state for application lifecycle BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use strr::application::{
    adapters::memory::{
        InMemoryApplicationRepository, InMemoryEventLog, InMemoryPaymentGateway,
        InMemoryRegistrationProvisioner,
    },
    domain::{Application, CallerContext, CallerRole, UserId},
    services::{ApplicationEndpoints, ApplicationLifecycleError, ApplicationLifecycleService},
};
use strr::config::QueryConfig;

/// Endpoints type used by the BDD world.
pub type TestEndpoints = ApplicationEndpoints<
    InMemoryApplicationRepository,
    InMemoryEventLog,
    InMemoryPaymentGateway,
    InMemoryRegistrationProvisioner,
    DefaultClock,
>;

/// Scenario world for application lifecycle behaviour tests.
pub struct LifecycleWorld {
    pub events: Arc<InMemoryEventLog>,
    pub payments: Arc<InMemoryPaymentGateway>,
    pub provisioner: Arc<InMemoryRegistrationProvisioner>,
    pub repository: Arc<InMemoryApplicationRepository>,
    pub endpoints: TestEndpoints,
    pub applicant: Option<CallerContext>,
    pub examiner: CallerContext,
    pub application: Option<Application>,
    pub last_error: Option<ApplicationLifecycleError>,
}

impl LifecycleWorld {
    /// Creates a world backed by fresh in-memory adapters.
    #[must_use]
    pub fn new() -> Self {
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

        Self {
            events,
            payments,
            provisioner,
            repository,
            endpoints: ApplicationEndpoints::new(lifecycle, QueryConfig::default()),
            applicant: None,
            examiner: CallerContext::new(UserId::new(900)).with_role(CallerRole::Examiner),
            application: None,
            last_error: None,
        }
    }

    /// Returns the scenario's current application.
    ///
    /// # Errors
    ///
    /// Returns an error if no application was submitted yet.
    pub fn current_application(&self) -> Result<&Application, eyre::Report> {
        self.application
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing application in scenario world"))
    }

    /// Records the outcome of a step that may fail.
    pub fn record(&mut self, result: Result<Application, ApplicationLifecycleError>) {
        match result {
            Ok(updated) => self.application = Some(updated),
            Err(err) => self.last_error = Some(err),
        }
    }
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LifecycleWorld {
    // Later scenarios find the subscriber already installed.
    drop(strr::telemetry::init("debug"));
    LifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
