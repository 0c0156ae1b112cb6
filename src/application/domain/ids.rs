//! Identifier and validated scalar types for the application domain.

use super::ApplicationDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a store-assigned integer identifier newtype.
macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps an identifier assigned by the backing store.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Unique identifier of a registration application.
    ApplicationId
);

integer_id!(
    /// Identifier of a user (applicant or examiner).
    UserId
);

integer_id!(
    /// Identifier of an invoice issued by the pay service.
    InvoiceId
);

integer_id!(
    /// Identifier of a provisioned registration.
    RegistrationId
);

integer_id!(
    /// Identifier of an appended audit event.
    EventId
);

/// Payment account identifier supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Longest account identifier the persisted schema accepts.
    pub const MAX_LENGTH: usize = 30;

    /// Creates a validated account identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::InvalidAccountId`] when the value is
    /// blank or longer than [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ApplicationDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().count() > Self::MAX_LENGTH {
            return Err(ApplicationDomainError::InvalidAccountId(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the account identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
