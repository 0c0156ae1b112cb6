//! In-memory application repository.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::application::{
    domain::{
        AccountId, Application, ApplicationFilter, ApplicationId, InvoiceId, NewApplication, Page,
        PayloadText, RegistrationId, UserId,
    },
    ports::{ApplicationRepository, ApplicationRepositoryError, ApplicationRepositoryResult},
};

/// Thread-safe in-memory application repository.
///
/// Every operation runs under a single lock, so read-check-write sequences in
/// `update` are atomic with respect to other writers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApplicationRepository {
    state: Arc<RwLock<InMemoryApplicationState>>,
}

#[derive(Debug, Default)]
struct InMemoryApplicationState {
    applications: BTreeMap<ApplicationId, Application>,
    last_id: i64,
}

impl InMemoryApplicationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ApplicationRepositoryError {
    ApplicationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Finds the first application satisfying `predicate`.
fn find_one(
    state: &InMemoryApplicationState,
    predicate: impl Fn(&Application) -> bool,
) -> Option<Application> {
    state.applications.values().find(|application| predicate(application)).cloned()
}

/// Collects matching applications newest first and slices the requested page.
fn page_newest_first(
    state: &InMemoryApplicationState,
    filter: &ApplicationFilter,
    predicate: impl Fn(&Application) -> bool,
) -> Page<Application> {
    let ordered = state
        .applications
        .values()
        .rev()
        .filter(|application| filter.status.is_none_or(|status| application.status() == status))
        .filter(|application| predicate(application))
        .cloned()
        .collect();
    Page::from_ordered(ordered, filter.pagination)
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn create(&self, application: &NewApplication) -> ApplicationRepositoryResult<Application> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.last_id += 1;
        let stored = application.clone().into_application(ApplicationId::new(state.last_id));
        state.applications.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, application: &Application) -> ApplicationRepositoryResult<Application> {
        let mut state = self.state.write().map_err(lock_error)?;
        let current = state
            .applications
            .get(&application.id())
            .ok_or(ApplicationRepositoryError::NotFound(application.id()))?;

        if current.version() != application.version() {
            return Err(ApplicationRepositoryError::ConcurrentModification {
                id: application.id(),
                expected_version: application.version(),
            });
        }

        let mut data = application.clone().into_persisted();
        data.version += 1;
        let stored = Application::from_persisted(data);
        state.applications.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: ApplicationId) -> ApplicationRepositoryResult<Option<Application>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.applications.get(&id).cloned())
    }

    async fn find_by_invoice_id(
        &self,
        invoice_id: InvoiceId,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(find_one(&state, |application| application.invoice_id() == Some(invoice_id)))
    }

    async fn find_by_registration_id(
        &self,
        registration_id: RegistrationId,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(find_one(&state, |application| {
            application.registration_id() == Some(registration_id)
        }))
    }

    async fn find_for_user_and_account(
        &self,
        user_id: UserId,
        account_id: Option<&AccountId>,
        filter: &ApplicationFilter,
        is_examiner: bool,
    ) -> ApplicationRepositoryResult<Page<Application>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(page_newest_first(&state, filter, |application| {
            is_examiner || application.is_owned_by(user_id, account_id)
        }))
    }

    async fn search(&self, filter: &ApplicationFilter) -> ApplicationRepositoryResult<Page<Application>> {
        let state = self.state.read().map_err(lock_error)?;
        let search_text = filter.search_text.as_deref();
        Ok(page_newest_first(&state, filter, |application| {
            search_text.is_none_or(|text| PayloadText::from_payload(application.payload()).matches(text))
        }))
    }
}
