//! Port contracts for application lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by application
//! services.

pub mod event_log;
pub mod payment;
pub mod provisioner;
pub mod repository;
pub mod validator;

pub use event_log::{EventLog, EventLogError, EventLogResult};
pub use payment::{PaymentGateway, PaymentGatewayError, PaymentGatewayResult};
pub use provisioner::{ProvisioningError, ProvisioningResult, RegistrationProvisioner};
pub use repository::{
    ApplicationRepository, ApplicationRepositoryError, ApplicationRepositoryResult,
};
pub use validator::{PayloadValidationError, PayloadValidationResult, PayloadValidator};
