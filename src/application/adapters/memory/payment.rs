//! In-memory stand-in for the pay service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::application::{
    domain::{AccountId, Application, InvoiceDetails, InvoiceId, PaymentStatus},
    ports::{PaymentGateway, PaymentGatewayError, PaymentGatewayResult},
};

/// Status code reported for freshly created invoices unless overridden.
const DEFAULT_CREATION_STATUS: &str = "CREATED";

/// Programmable in-memory payment gateway.
#[derive(Debug, Clone)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

#[derive(Debug)]
struct InMemoryPaymentState {
    invoices: HashMap<InvoiceId, InvoiceDetails>,
    last_invoice_id: i64,
    creation_status: String,
    status_lookups: Vec<(AccountId, InvoiceId)>,
}

impl InMemoryPaymentGateway {
    /// Creates a gateway that issues invoices in `CREATED` status.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryPaymentState {
                invoices: HashMap::new(),
                last_invoice_id: 0,
                creation_status: DEFAULT_CREATION_STATUS.to_owned(),
                status_lookups: Vec::new(),
            })),
        }
    }

    /// Sets the status code reported for newly created invoices.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentGatewayError::Unavailable`] if the lock is poisoned.
    pub fn set_creation_status(&self, status_code: impl Into<String>) -> PaymentGatewayResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.creation_status = status_code.into();
        Ok(())
    }

    /// Returns the account and invoice of every status lookup, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentGatewayError::Unavailable`] if the lock is poisoned.
    pub fn status_lookups(&self) -> PaymentGatewayResult<Vec<(AccountId, InvoiceId)>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.status_lookups.clone())
    }

    /// Records a new status (and optional payment date) for an invoice.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentGatewayError::InvoiceNotFound`] for unknown invoices.
    pub fn set_invoice_status(
        &self,
        invoice_id: InvoiceId,
        status_code: impl Into<String>,
        payment_date: Option<String>,
    ) -> PaymentGatewayResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let invoice = state
            .invoices
            .get_mut(&invoice_id)
            .ok_or(PaymentGatewayError::InvoiceNotFound(invoice_id))?;
        invoice.status_code = Some(status_code.into());
        invoice.payment_date = payment_date;
        Ok(())
    }
}

impl Default for InMemoryPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(err: impl ToString) -> PaymentGatewayError {
    PaymentGatewayError::Unavailable(err.to_string())
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_invoice(
        &self,
        account_id: &AccountId,
        _application: &Application,
    ) -> PaymentGatewayResult<InvoiceDetails> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.last_invoice_id += 1;
        let invoice_id = InvoiceId::new(state.last_invoice_id);
        let invoice = InvoiceDetails::new(invoice_id, account_id, state.creation_status.clone());
        state.invoices.insert(invoice_id, invoice.clone());
        Ok(invoice)
    }

    async fn get_invoice_status(
        &self,
        account_id: &AccountId,
        invoice_id: InvoiceId,
    ) -> PaymentGatewayResult<InvoiceDetails> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.status_lookups.push((account_id.clone(), invoice_id));
        state
            .invoices
            .get(&invoice_id)
            .cloned()
            .ok_or(PaymentGatewayError::InvoiceNotFound(invoice_id))
    }

    async fn get_payment_receipt(
        &self,
        account_id: &AccountId,
        invoice_id: InvoiceId,
    ) -> PaymentGatewayResult<Vec<u8>> {
        let state = self.state.read().map_err(lock_error)?;
        let invoice = state
            .invoices
            .get(&invoice_id)
            .ok_or(PaymentGatewayError::InvoiceNotFound(invoice_id))?;
        let is_paid = invoice
            .status_code
            .as_deref()
            .map(PaymentStatus::from_code)
            .is_some_and(|status| matches!(status, PaymentStatus::Completed | PaymentStatus::Approved));
        if !is_paid {
            return Err(PaymentGatewayError::Rejected {
                status: 400,
                message: format!("invoice {invoice_id} is not paid"),
            });
        }
        Ok(format!("receipt for invoice {invoice_id} on account {account_id}").into_bytes())
    }
}
