//! In-memory event log.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, RwLock};

use crate::application::{
    domain::{ApplicationEvent, ApplicationId, EventId, NewApplicationEvent},
    ports::{EventLog, EventLogError, EventLogResult},
};

/// Thread-safe in-memory audit trail.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventLog {
    events: Arc<RwLock<Vec<ApplicationEvent>>>,
}

impl InMemoryEventLog {
    /// Creates an empty event log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every appended event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`EventLogError::Persistence`] if the lock is poisoned.
    pub fn all(&self) -> EventLogResult<Vec<ApplicationEvent>> {
        let events = self.events.read().map_err(lock_error)?;
        Ok(events.clone())
    }
}

fn lock_error(err: impl ToString) -> EventLogError {
    EventLogError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn append(&self, event: &NewApplicationEvent) -> EventLogResult<ApplicationEvent> {
        let mut events = self.events.write().map_err(lock_error)?;
        let next_id = i64::try_from(events.len())
            .map_err(EventLogError::persistence)?
            .saturating_add(1);
        let stored = ApplicationEvent::from_new(EventId::new(next_id), event.clone(), DefaultClock.utc());
        events.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_application(
        &self,
        application_id: ApplicationId,
        applicant_visible_only: bool,
    ) -> EventLogResult<Vec<ApplicationEvent>> {
        let events = self.events.read().map_err(lock_error)?;
        Ok(events
            .iter()
            .filter(|event| event.application_id == application_id)
            .filter(|event| !applicant_visible_only || event.visible_to_applicant)
            .cloned()
            .collect())
    }
}
