//! Application services for lifecycle orchestration and boundary checks.

mod endpoints;
mod error;
mod lifecycle;

pub use endpoints::{ApplicationEndpoints, ApplicationQuery};
pub use error::{ApplicationLifecycleError, ApplicationLifecycleResult, ErrorKind};
pub use lifecycle::ApplicationLifecycleService;
