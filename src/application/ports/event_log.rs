//! Event log port for the application audit trail.

use crate::application::domain::{ApplicationEvent, ApplicationId, NewApplicationEvent};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event log operations.
pub type EventLogResult<T> = Result<T, EventLogError>;

/// Append-only audit trail keyed by application.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Appends an immutable event and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`EventLogError::Persistence`] when the event is not durable.
    async fn append(&self, event: &NewApplicationEvent) -> EventLogResult<ApplicationEvent>;

    /// Lists the events of an application, oldest first.
    ///
    /// When `applicant_visible_only` is set, events hidden from the applicant
    /// are omitted.
    async fn list_for_application(
        &self,
        application_id: ApplicationId,
        applicant_visible_only: bool,
    ) -> EventLogResult<Vec<ApplicationEvent>>;
}

/// Errors returned by event log implementations.
#[derive(Debug, Clone, Error)]
pub enum EventLogError {
    /// Persistence-layer failure.
    #[error("event log persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventLogError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
