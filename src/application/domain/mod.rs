//! Domain model for registration application lifecycle management.
//!
//! The domain models applications, their status machine, payment
//! reconciliation and examiner decisions while keeping persistence and
//! external services outside of the domain boundary.

mod application;
mod caller;
mod error;
mod event;
mod ids;
mod payment;
mod query;
mod registration;
mod status;

pub use application::{Application, NewApplication, PersistedApplicationData, ReconcileOutcome};
pub use caller::{CallerContext, CallerRole};
pub use error::{ApplicationDomainError, ParseApplicationStatusError};
pub use event::{
    ApplicationEvent, EventName, EventType, NewApplicationEvent, UnknownEventValue,
};
pub use ids::{AccountId, ApplicationId, EventId, InvoiceId, RegistrationId, UserId};
pub use payment::{
    InvoiceDetails, InvoiceDetailsError, InvoicePaymentAccount, PaymentStatus, ValidatedInvoice,
};
pub use query::{ApplicationFilter, Page, Pagination, PayloadText};
pub use registration::{
    MAX_REGISTRATION_TERM_DAYS, REGISTRATION_SECTION, Registration, RegistrationData,
    RegistrationStatus, registration_expiry, registration_number,
};
pub use status::{ApplicationStatus, ApplicationType};
