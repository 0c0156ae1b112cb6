//! `PostgreSQL` event log implementation.

use super::{
    models::{ApplicationEventRow, NewApplicationEventRow},
    pool::{PgPool, run_blocking},
    schema::application_events,
};
use crate::application::{
    domain::{
        ApplicationEvent, ApplicationId, EventId, EventName, EventType, NewApplicationEvent,
        RegistrationId,
    },
    ports::{EventLog, EventLogError, EventLogResult},
};
use async_trait::async_trait;
use diesel::prelude::*;
use mockable::{Clock, DefaultClock};

/// `PostgreSQL`-backed append-only audit trail.
#[derive(Debug, Clone)]
pub struct PostgresEventLog {
    pool: PgPool,
}

impl PostgresEventLog {
    /// Creates a new event log from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventLog for PostgresEventLog {
    async fn append(&self, event: &NewApplicationEvent) -> EventLogResult<ApplicationEvent> {
        let new_row = NewApplicationEventRow {
            application_id: event.application_id.value(),
            registration_id: event.registration_id.map(RegistrationId::value),
            event_type: event.event_type.as_str().to_owned(),
            event_name: event.event_name.as_str().to_owned(),
            visible_to_applicant: event.visible_to_applicant,
            created_at: DefaultClock.utc(),
        };
        run_blocking(&self.pool, move |connection| {
            let row = diesel::insert_into(application_events::table)
                .values(&new_row)
                .returning(ApplicationEventRow::as_returning())
                .get_result::<ApplicationEventRow>(connection)
                .map_err(EventLogError::persistence)?;
            row_to_event(row)
        })
        .await
    }

    async fn list_for_application(
        &self,
        application_id: ApplicationId,
        applicant_visible_only: bool,
    ) -> EventLogResult<Vec<ApplicationEvent>> {
        run_blocking(&self.pool, move |connection| {
            let mut query = application_events::table
                .filter(application_events::application_id.eq(application_id.value()))
                .into_boxed();
            if applicant_visible_only {
                query = query.filter(application_events::visible_to_applicant.eq(true));
            }
            let rows = query
                .order(application_events::id.asc())
                .load::<ApplicationEventRow>(connection)
                .map_err(EventLogError::persistence)?;
            rows.into_iter().map(row_to_event).collect()
        })
        .await
    }
}

fn row_to_event(row: ApplicationEventRow) -> EventLogResult<ApplicationEvent> {
    Ok(ApplicationEvent {
        id: EventId::new(row.id),
        event_type: EventType::try_from(row.event_type.as_str()).map_err(EventLogError::persistence)?,
        event_name: EventName::try_from(row.event_name.as_str()).map_err(EventLogError::persistence)?,
        application_id: ApplicationId::new(row.application_id),
        registration_id: row.registration_id.map(RegistrationId::new),
        visible_to_applicant: row.visible_to_applicant,
        created_at: row.created_at,
    })
}
