//! Connection pool construction and blocking-call helpers.
//!
//! Diesel is synchronous, so every query runs on Tokio's blocking thread pool
//! to keep the async executor's worker threads free.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

use crate::application::ports::{ApplicationRepositoryError, EventLogError, ProvisioningError};

/// `PostgreSQL` connection pool shared by the application adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool for `database_url` holding up to `max_size`
/// connections.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be opened.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

/// Failures raised while handing work to the blocking pool.
#[derive(Debug, Error)]
pub enum BlockingError {
    /// No connection could be checked out.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    /// The blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<BlockingError> for ApplicationRepositoryError {
    fn from(err: BlockingError) -> Self {
        Self::persistence(err)
    }
}

impl From<BlockingError> for EventLogError {
    fn from(err: BlockingError) -> Self {
        Self::persistence(err)
    }
}

impl From<BlockingError> for ProvisioningError {
    fn from(err: BlockingError) -> Self {
        Self::persistence(err)
    }
}

/// Runs `f` with a pooled connection on the blocking thread pool.
pub(super) async fn run_blocking<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<BlockingError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(BlockingError::from)?;
        f(&mut connection)
    })
    .await
    .map_err(|err| E::from(BlockingError::from(err)))?
}
