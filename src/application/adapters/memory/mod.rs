//! In-memory adapters for application lifecycle ports.
//!
//! These adapters back tests and embedders that do not need durable storage.

mod application;
mod event_log;
mod payment;
mod provisioner;

pub use application::InMemoryApplicationRepository;
pub use event_log::InMemoryEventLog;
pub use payment::InMemoryPaymentGateway;
pub use provisioner::InMemoryRegistrationProvisioner;
