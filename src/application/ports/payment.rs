//! Pay service port used to invoice applications and track payment.

use crate::application::domain::{AccountId, Application, InvoiceDetails, InvoiceId};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for payment gateway operations.
pub type PaymentGatewayResult<T> = Result<T, PaymentGatewayError>;

/// External payment service.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an invoice for an application billed to `account_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentGatewayError`] on transport or provider failure.
    async fn create_invoice(
        &self,
        account_id: &AccountId,
        application: &Application,
    ) -> PaymentGatewayResult<InvoiceDetails>;

    /// Reports the current state of an invoice.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentGatewayError`] on transport or provider failure.
    async fn get_invoice_status(
        &self,
        account_id: &AccountId,
        invoice_id: InvoiceId,
    ) -> PaymentGatewayResult<InvoiceDetails>;

    /// Renders the payment receipt for a paid invoice.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentGatewayError`] on transport or provider failure.
    async fn get_payment_receipt(
        &self,
        account_id: &AccountId,
        invoice_id: InvoiceId,
    ) -> PaymentGatewayResult<Vec<u8>>;
}

/// Errors returned by payment gateway implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentGatewayError {
    /// The pay service could not be reached.
    #[error("pay service unavailable: {0}")]
    Unavailable(String),

    /// The pay service rejected the request.
    #[error("pay service rejected the request with status {status}: {message}")]
    Rejected {
        /// Status reported by the pay service.
        status: u16,
        /// Provider error message.
        message: String,
    },

    /// The pay service has no such invoice.
    #[error("invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),
}
