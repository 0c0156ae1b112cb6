//! Service-level errors and their classification into response kinds.

use crate::application::{
    domain::{
        ApplicationDomainError, ApplicationId, InvoiceDetailsError, InvoiceId,
        ParseApplicationStatusError, UserId,
    },
    ports::{
        ApplicationRepositoryError, EventLogError, PayloadValidationError, PaymentGatewayError,
        ProvisioningError,
    },
};
use thiserror::Error;

/// Caller-facing classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input.
    Validation,
    /// The caller lacks rights over the target.
    Authorization,
    /// The application or invoice does not exist.
    NotFound,
    /// The pay service is unreachable or returned an error.
    ExternalService,
    /// Registration creation failed.
    Provisioning,
    /// The requested change violates the lifecycle rules.
    InvalidState,
    /// Unexpected infrastructure failure.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status code a transport layer should answer with.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Validation | Self::InvalidState => 400,
            Self::Authorization => 403,
            Self::NotFound => 404,
            Self::ExternalService | Self::Provisioning => 502,
            Self::Internal => 500,
        }
    }
}

/// Errors returned by lifecycle and boundary operations.
#[derive(Debug, Error)]
pub enum ApplicationLifecycleError {
    /// Domain validation or a lifecycle rule failed.
    #[error(transparent)]
    Domain(#[from] ApplicationDomainError),
    /// A status filter or target did not name a known status.
    #[error(transparent)]
    InvalidStatus(#[from] ParseApplicationStatusError),
    /// The submitted payload failed validation.
    #[error(transparent)]
    Payload(#[from] PayloadValidationError),
    /// The pay service returned incomplete invoice details.
    #[error("malformed invoice details: {0}")]
    Invoice(#[from] InvoiceDetailsError),
    /// The pay service call failed.
    #[error(transparent)]
    Payment(#[from] PaymentGatewayError),
    /// Registration provisioning failed.
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
    /// Application storage failed.
    #[error(transparent)]
    Repository(#[from] ApplicationRepositoryError),
    /// Reading the audit trail failed.
    #[error(transparent)]
    EventLog(#[from] EventLogError),
    /// No application has the requested identifier.
    #[error("application not found: {0}")]
    NotFound(ApplicationId),
    /// No application is billed by the invoice.
    #[error("no application found for invoice {0}")]
    InvoiceNotFound(InvoiceId),
    /// The caller does not own the application.
    #[error("user {user_id} is not authorized to access application {application_id}")]
    Unauthorized {
        /// Requesting user.
        user_id: UserId,
        /// Target application.
        application_id: ApplicationId,
    },
    /// The caller lacks the role the operation requires.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    /// The operation needs a payment account identifier.
    #[error("an account id is required")]
    MissingAccountId,
    /// Search text is shorter than the configured minimum.
    #[error("search text must be at least {min} characters")]
    SearchTextTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// The application has not been invoiced yet.
    #[error("application {0} has no invoice")]
    NoInvoice(ApplicationId),
    /// The application has not been paid.
    #[error("application {0} has not been paid")]
    NotPaid(ApplicationId),
}

impl ApplicationLifecycleError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => domain_kind(err),
            Self::InvalidStatus(_)
            | Self::Payload(_)
            | Self::MissingAccountId
            | Self::SearchTextTooShort { .. } => ErrorKind::Validation,
            Self::Invoice(_) => ErrorKind::ExternalService,
            Self::Payment(PaymentGatewayError::InvoiceNotFound(_))
            | Self::NotFound(_)
            | Self::InvoiceNotFound(_)
            | Self::Repository(ApplicationRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Payment(_) => ErrorKind::ExternalService,
            Self::Provisioning(_) => ErrorKind::Provisioning,
            Self::Repository(ApplicationRepositoryError::ConcurrentModification { .. })
            | Self::NoInvoice(_)
            | Self::NotPaid(_) => ErrorKind::InvalidState,
            Self::Repository(ApplicationRepositoryError::Persistence(_)) | Self::EventLog(_) => {
                ErrorKind::Internal
            }
            Self::Unauthorized { .. } | Self::Forbidden(_) => ErrorKind::Authorization,
        }
    }

    /// Returns the HTTP status code for the error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

const fn domain_kind(err: &ApplicationDomainError) -> ErrorKind {
    match err {
        ApplicationDomainError::InvalidAccountId(_)
        | ApplicationDomainError::UnknownApplicationType(_)
        | ApplicationDomainError::InvalidPage(_)
        | ApplicationDomainError::InvalidLimit { .. }
        | ApplicationDomainError::MissingRegistrationData => ErrorKind::Validation,
        ApplicationDomainError::TerminalState { .. }
        | ApplicationDomainError::NotStaffActionable(_)
        | ApplicationDomainError::NoDecisionEvent(_) => ErrorKind::InvalidState,
        ApplicationDomainError::MissingRegistration(_) => ErrorKind::Internal,
    }
}

/// Result type for lifecycle and boundary operations.
pub type ApplicationLifecycleResult<T> = Result<T, ApplicationLifecycleError>;
