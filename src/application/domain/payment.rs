//! Invoice details reported by the pay service and their validated form.

use super::{AccountId, InvoiceId};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Payment status code reported for an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// Invoice created, payment not yet attempted.
    Created,
    /// Payment approved but not yet settled.
    Approved,
    /// Payment completed.
    Completed,
    /// Any other status code the pay service reports.
    Other(String),
}

impl PaymentStatus {
    /// Parses a status code as reported by the pay service.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "CREATED" => Self::Created,
            "APPROVED" => Self::Approved,
            "COMPLETED" => Self::Completed,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "CREATED",
            Self::Approved => "APPROVED",
            Self::Completed => "COMPLETED",
            Self::Other(code) => code,
        }
    }

    /// Returns `true` for a completed payment.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment account section of an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePaymentAccount {
    /// Account the invoice is billed to.
    pub account_id: Option<String>,
}

/// Invoice details as reported by the pay service.
///
/// Fields are optional because the payload is external; use
/// [`InvoiceDetails::validate`] before acting on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetails {
    /// Invoice identifier.
    pub id: Option<i64>,
    /// Billed payment account.
    pub payment_account: Option<InvoicePaymentAccount>,
    /// Payment status code.
    pub status_code: Option<String>,
    /// ISO-8601 payment date, present once payment completed.
    pub payment_date: Option<String>,
}

impl InvoiceDetails {
    /// Builds invoice details with the required fields populated.
    #[must_use]
    pub fn new(id: InvoiceId, account_id: &AccountId, status_code: impl Into<String>) -> Self {
        Self {
            id: Some(id.value()),
            payment_account: Some(InvoicePaymentAccount {
                account_id: Some(account_id.as_str().to_owned()),
            }),
            status_code: Some(status_code.into()),
            payment_date: None,
        }
    }

    /// Sets the payment date.
    #[must_use]
    pub fn with_payment_date(mut self, payment_date: impl Into<String>) -> Self {
        self.payment_date = Some(payment_date.into());
        self
    }

    /// Checks required fields and parses them into typed values.
    ///
    /// The payment date is required only when the status is `COMPLETED`.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceDetailsError`] when a required field is missing or
    /// cannot be parsed.
    pub fn validate(&self) -> Result<ValidatedInvoice, InvoiceDetailsError> {
        let invoice_id = self.id.map(InvoiceId::new).ok_or(InvoiceDetailsError::MissingField("id"))?;
        let raw_account = self
            .payment_account
            .as_ref()
            .and_then(|account| account.account_id.as_deref())
            .ok_or(InvoiceDetailsError::MissingField("paymentAccount.accountId"))?;
        let account_id = AccountId::new(raw_account)
            .map_err(|_| InvoiceDetailsError::InvalidAccountId(raw_account.to_owned()))?;
        let status = self
            .status_code
            .as_deref()
            .map(PaymentStatus::from_code)
            .ok_or(InvoiceDetailsError::MissingField("statusCode"))?;

        let payment_date = match (&status, self.payment_date.as_deref()) {
            (PaymentStatus::Completed, None) => {
                return Err(InvoiceDetailsError::MissingField("paymentDate"));
            }
            (_, Some(raw)) => Some(parse_payment_date(raw)?),
            (_, None) => None,
        };

        Ok(ValidatedInvoice {
            invoice_id,
            account_id,
            status,
            payment_date,
        })
    }
}

/// Invoice details with all fields needed for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInvoice {
    /// Invoice identifier.
    pub invoice_id: InvoiceId,
    /// Billed payment account.
    pub account_id: AccountId,
    /// Reported payment status.
    pub status: PaymentStatus,
    /// Reported payment date, if any.
    pub payment_date: Option<DateTime<Utc>>,
}

/// Errors raised for malformed invoice details.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvoiceDetailsError {
    /// A required field is absent.
    #[error("invoice details missing required field '{0}'")]
    MissingField(&'static str),

    /// The billed account identifier is not a valid account id.
    #[error("invoice details carry invalid account id '{0}'")]
    InvalidAccountId(String),

    /// The payment date is not an ISO-8601 timestamp.
    #[error("invoice details carry invalid payment date '{0}'")]
    InvalidPaymentDate(String),
}

/// Offset-carrying layouts tried after RFC 3339.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Layouts without an offset; these are taken as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601 timestamp or calendar date.
///
/// Accepts a `T` or space separator, optional seconds and fractions, and an
/// optional offset. Values without an offset are taken as UTC, and a bare
/// date means midnight UTC.
fn parse_payment_date(raw: &str) -> Result<DateTime<Utc>, InvoiceDetailsError> {
    let value = raw.trim();
    let with_offset = DateTime::parse_from_rfc3339(value).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(value, format).ok())
    });
    let naive = || {
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
    };

    with_offset
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|| naive().map(|parsed| parsed.and_utc()))
        .ok_or_else(|| InvoiceDetailsError::InvalidPaymentDate(raw.to_owned()))
}
