//! Filters, pagination and the text projection used for application search.

use super::{ApplicationDomainError, ApplicationStatus};
use serde::Serialize;
use serde_json::Value;

/// Validated page request; pages are numbered from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Creates a validated page request.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::InvalidPage`] for page zero and
    /// [`ApplicationDomainError::InvalidLimit`] when `limit` is zero or above
    /// `max_limit`.
    pub const fn new(page: u32, limit: u32, max_limit: u32) -> Result<Self, ApplicationDomainError> {
        if page == 0 {
            return Err(ApplicationDomainError::InvalidPage(page));
        }
        if limit == 0 || limit > max_limit {
            return Err(ApplicationDomainError::InvalidLimit {
                limit,
                max: max_limit,
            });
        }
        Ok(Self { page, limit })
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Returns the number of items preceding this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Criteria shared by the per-user listing and the full-text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationFilter {
    /// Exact status to match.
    pub status: Option<ApplicationStatus>,
    /// Free text matched against the payload projection.
    pub search_text: Option<String>,
    /// Requested page.
    pub pagination: Pagination,
}

impl ApplicationFilter {
    /// Creates a filter matching every application.
    #[must_use]
    pub const fn new(pagination: Pagination) -> Self {
        Self {
            status: None,
            search_text: None,
            pagination,
        }
    }

    /// Restricts results to a single status.
    #[must_use]
    pub const fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to payloads matching `text`.
    #[must_use]
    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }
}

/// One page of results together with the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Number of items matching the query across all pages.
    pub total: u64,
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl<T> Page<T> {
    /// Slices an already ordered result set into the requested page.
    #[must_use]
    pub fn from_ordered(ordered: Vec<T>, pagination: Pagination) -> Self {
        let total = ordered.len() as u64;
        let skip = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
        let items = ordered.into_iter().skip(skip).take(take).collect();
        Self {
            items,
            total,
            page: pagination.page(),
            limit: pagination.limit(),
        }
    }
}

/// Lower-cased word tokens drawn from every string value in a payload.
///
/// Mirrors the string-only text vector the database derives for full-text
/// search; matching is by whole token, without stemming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadText {
    tokens: Vec<String>,
}

impl PayloadText {
    /// Builds the projection for a payload.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        let mut tokens = Vec::new();
        collect_tokens(payload, &mut tokens);
        Self { tokens }
    }

    /// Returns `true` when every word of `query` occurs in the projection.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let terms = tokenize(query);
        !terms.is_empty() && terms.iter().all(|term| self.tokens.contains(term))
    }
}

fn collect_tokens(value: &Value, tokens: &mut Vec<String>) {
    match value {
        Value::String(text) => tokens.extend(tokenize(text)),
        Value::Array(items) => items.iter().for_each(|item| collect_tokens(item, tokens)),
        Value::Object(fields) => fields.values().for_each(|field| collect_tokens(field, tokens)),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}
