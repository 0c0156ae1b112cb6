//! Repository port for application persistence and queries.

use crate::application::domain::{
    AccountId, Application, ApplicationFilter, ApplicationId, InvoiceId, NewApplication, Page,
    RegistrationId, UserId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for application repository operations.
pub type ApplicationRepositoryResult<T> = Result<T, ApplicationRepositoryError>;

/// Application persistence contract.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Stores a new draft application and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::Persistence`] when storage fails.
    async fn create(&self, application: &NewApplication) -> ApplicationRepositoryResult<Application>;

    /// Persists changes to an existing application.
    ///
    /// The write succeeds only if the stored version still equals
    /// `application.version()`; the returned application carries the new
    /// version.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::NotFound`] when the application
    /// does not exist and [`ApplicationRepositoryError::ConcurrentModification`]
    /// when another writer updated it first.
    async fn update(&self, application: &Application) -> ApplicationRepositoryResult<Application>;

    /// Finds an application by identifier.
    async fn find_by_id(&self, id: ApplicationId) -> ApplicationRepositoryResult<Option<Application>>;

    /// Finds the application billed by an invoice.
    async fn find_by_invoice_id(
        &self,
        invoice_id: InvoiceId,
    ) -> ApplicationRepositoryResult<Option<Application>>;

    /// Finds the application a registration was provisioned from.
    async fn find_by_registration_id(
        &self,
        registration_id: RegistrationId,
    ) -> ApplicationRepositoryResult<Option<Application>>;

    /// Lists applications visible to a user, newest first.
    ///
    /// Non-examiners only see applications they submitted on `account_id`.
    /// `filter.search_text` is ignored.
    async fn find_for_user_and_account(
        &self,
        user_id: UserId,
        account_id: Option<&AccountId>,
        filter: &ApplicationFilter,
        is_examiner: bool,
    ) -> ApplicationRepositoryResult<Page<Application>>;

    /// Searches all applications, newest first, matching `filter.search_text`
    /// against the payload text projection.
    async fn search(&self, filter: &ApplicationFilter) -> ApplicationRepositoryResult<Page<Application>>;
}

/// Errors returned by application repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ApplicationRepositoryError {
    /// The application was not found.
    #[error("application not found: {0}")]
    NotFound(ApplicationId),

    /// Another writer changed the application after it was loaded.
    #[error("application {id} was modified concurrently (expected version {expected_version})")]
    ConcurrentModification {
        /// Application identifier.
        id: ApplicationId,
        /// Version the caller loaded.
        expected_version: i64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ApplicationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
