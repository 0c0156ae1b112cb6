//! Port for provisioning registrations from approved applications.

use crate::application::domain::{AccountId, Registration, RegistrationData, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for registration provisioning.
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;

/// Creates durable registrations.
#[async_trait]
pub trait RegistrationProvisioner: Send + Sync {
    /// Creates a registration owned by `submitter_id` on `account_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError`] when the registration cannot be created.
    async fn create(
        &self,
        submitter_id: UserId,
        account_id: &AccountId,
        data: &RegistrationData,
    ) -> ProvisioningResult<Registration>;
}

/// Errors returned by registration provisioners.
#[derive(Debug, Clone, Error)]
pub enum ProvisioningError {
    /// The registration data was refused.
    #[error("registration rejected: {0}")]
    Rejected(String),

    /// The configured term cannot produce a valid expiry date.
    #[error("registration term of {0} days is out of range")]
    InvalidTerm(i64),

    /// Persistence-layer failure.
    #[error("registration persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProvisioningError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
