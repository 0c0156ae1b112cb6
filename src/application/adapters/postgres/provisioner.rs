//! `PostgreSQL` registration provisioner.

use super::{
    models::{NewRegistrationRow, NextIdRow},
    pool::{PgPool, run_blocking},
    schema::registrations,
};
use crate::application::{
    domain::{
        AccountId, Registration, RegistrationData, RegistrationId, RegistrationStatus, UserId,
        registration_expiry, registration_number,
    },
    ports::{ProvisioningError, ProvisioningResult, RegistrationProvisioner},
};
use async_trait::async_trait;
use diesel::prelude::*;
use mockable::Clock;
use std::sync::Arc;

/// Creates registrations in the `registrations` table.
///
/// The identifier is drawn from the table sequence first so the registration
/// number can be written in the same insert.
#[derive(Clone)]
pub struct PostgresRegistrationProvisioner<C>
where
    C: Clock + Send + Sync,
{
    pool: PgPool,
    clock: Arc<C>,
    term_days: i64,
}

impl<C> PostgresRegistrationProvisioner<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a provisioner issuing registrations of `term_days` days.
    #[must_use]
    pub const fn new(pool: PgPool, clock: Arc<C>, term_days: i64) -> Self {
        Self {
            pool,
            clock,
            term_days,
        }
    }
}

#[async_trait]
impl<C> RegistrationProvisioner for PostgresRegistrationProvisioner<C>
where
    C: Clock + Send + Sync,
{
    async fn create(
        &self,
        submitter_id: UserId,
        account_id: &AccountId,
        data: &RegistrationData,
    ) -> ProvisioningResult<Registration> {
        let start_date = self.clock.utc();
        let expiry_date = registration_expiry(start_date, self.term_days)
            .ok_or(ProvisioningError::InvalidTerm(self.term_days))?;
        let account = account_id.clone();
        let registration_data = data.as_value().clone();

        run_blocking(&self.pool, move |connection| {
            connection
                .transaction::<_, diesel::result::Error, _>(|tx| {
                    let id = diesel::sql_query("SELECT nextval('registrations_id_seq') AS id")
                        .get_result::<NextIdRow>(tx)?
                        .id;
                    let registration = Registration {
                        id: RegistrationId::new(id),
                        registration_number: registration_number(RegistrationId::new(id), start_date),
                        submitter_id,
                        payment_account: account,
                        status: RegistrationStatus::Active,
                        start_date,
                        expiry_date,
                    };
                    diesel::insert_into(registrations::table)
                        .values(&NewRegistrationRow {
                            id,
                            registration_number: registration.registration_number.clone(),
                            submitter_id: submitter_id.value(),
                            payment_account: registration.payment_account.as_str().to_owned(),
                            status: registration.status.as_str().to_owned(),
                            start_date,
                            expiry_date,
                            registration_data,
                        })
                        .execute(tx)?;
                    Ok(registration)
                })
                .map_err(ProvisioningError::persistence)
        })
        .await
    }
}
