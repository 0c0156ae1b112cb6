//! `PostgreSQL` adapters for application lifecycle persistence.

mod event_log;
mod models;
mod pool;
mod provisioner;
mod repository;
mod schema;

pub use event_log::PostgresEventLog;
pub use pool::{BlockingError, PgPool, build_pool};
pub use provisioner::PostgresRegistrationProvisioner;
pub use repository::PostgresApplicationRepository;
