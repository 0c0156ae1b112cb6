//! In-memory registration provisioner.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, RwLock};

use crate::application::{
    domain::{
        AccountId, Registration, RegistrationData, RegistrationId, RegistrationStatus, UserId,
        registration_expiry, registration_number,
    },
    ports::{ProvisioningError, ProvisioningResult, RegistrationProvisioner},
};

/// Default length of a registration term.
const DEFAULT_TERM_DAYS: i64 = 365;

/// Thread-safe in-memory registration provisioner.
#[derive(Debug, Clone)]
pub struct InMemoryRegistrationProvisioner {
    registrations: Arc<RwLock<Vec<(Registration, RegistrationData)>>>,
    term_days: i64,
}

impl InMemoryRegistrationProvisioner {
    /// Creates a provisioner issuing one-year registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::with_term_days(DEFAULT_TERM_DAYS)
    }

    /// Creates a provisioner issuing registrations of `term_days` days.
    ///
    /// An out-of-range term is reported by [`RegistrationProvisioner::create`].
    #[must_use]
    pub fn with_term_days(term_days: i64) -> Self {
        Self {
            registrations: Arc::new(RwLock::new(Vec::new())),
            term_days,
        }
    }

    /// Returns every provisioned registration with the data it was built from.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Persistence`] if the lock is poisoned.
    pub fn registrations(&self) -> ProvisioningResult<Vec<(Registration, RegistrationData)>> {
        let registrations = self.registrations.read().map_err(lock_error)?;
        Ok(registrations.clone())
    }
}

impl Default for InMemoryRegistrationProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(err: impl ToString) -> ProvisioningError {
    ProvisioningError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl RegistrationProvisioner for InMemoryRegistrationProvisioner {
    async fn create(
        &self,
        submitter_id: UserId,
        account_id: &AccountId,
        data: &RegistrationData,
    ) -> ProvisioningResult<Registration> {
        let start_date = DefaultClock.utc();
        let expiry_date = registration_expiry(start_date, self.term_days)
            .ok_or(ProvisioningError::InvalidTerm(self.term_days))?;
        let mut registrations = self.registrations.write().map_err(lock_error)?;
        let next_id = i64::try_from(registrations.len())
            .map_err(ProvisioningError::persistence)?
            .saturating_add(1);
        let id = RegistrationId::new(next_id);
        let registration = Registration {
            id,
            registration_number: registration_number(id, start_date),
            submitter_id,
            payment_account: account_id.clone(),
            status: RegistrationStatus::Active,
            start_date,
            expiry_date,
        };
        registrations.push((registration.clone(), data.clone()));
        Ok(registration)
    }
}
