//! Environment-driven configuration.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file. Every setting has a default except the database URL, which
//! is only needed by the `PostgreSQL` adapters.

use crate::application::domain::MAX_REGISTRATION_TERM_DAYS;
use std::env;
use std::num::ParseIntError;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SEARCH_MIN_LENGTH: usize = 3;
const DEFAULT_PAGE_LIMIT: u32 = 50;
const DEFAULT_MAX_PAGE_LIMIT: u32 = 100;
const DEFAULT_REGISTRATION_TERM_DAYS: i64 = 365;
const DEFAULT_DB_POOL_SIZE: u32 = 10;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `PostgreSQL` connection string, if persistence is configured.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub db_pool_size: u32,
    /// Tracing filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Application query limits.
    pub query: QueryConfig,
    /// Length of a provisioned registration's term, in days.
    pub registration_term_days: i64,
}

/// Limits applied to application listing and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    /// Shortest accepted full-text search string.
    pub search_min_length: usize,
    /// Page size used when the caller does not ask for one.
    pub default_page_limit: u32,
    /// Largest page size a caller may request.
    pub max_page_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            search_min_length: DEFAULT_SEARCH_MIN_LENGTH,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: DEFAULT_MAX_PAGE_LIMIT,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let query = QueryConfig {
            search_min_length: parse_or(&lookup, "STRR_SEARCH_MIN_LENGTH", DEFAULT_SEARCH_MIN_LENGTH)?,
            default_page_limit: parse_or(&lookup, "STRR_DEFAULT_PAGE_LIMIT", DEFAULT_PAGE_LIMIT)?,
            max_page_limit: parse_or(&lookup, "STRR_MAX_PAGE_LIMIT", DEFAULT_MAX_PAGE_LIMIT)?,
        };
        if query.default_page_limit == 0 || query.default_page_limit > query.max_page_limit {
            return Err(ConfigError::PageLimits {
                default: query.default_page_limit,
                max: query.max_page_limit,
            });
        }

        let registration_term_days = parse_or(
            &lookup,
            "STRR_REGISTRATION_TERM_DAYS",
            DEFAULT_REGISTRATION_TERM_DAYS,
        )?;
        if !(1..=MAX_REGISTRATION_TERM_DAYS).contains(&registration_term_days) {
            return Err(ConfigError::RegistrationTerm(registration_term_days));
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            db_pool_size: parse_or(&lookup, "STRR_DB_POOL_SIZE", DEFAULT_DB_POOL_SIZE)?,
            log_level: lookup("STRR_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            query,
            registration_term_days,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|source| ConfigError::InvalidNumber { key, source })
    })
}

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable did not parse.
    #[error("{key} must be a non-negative integer")]
    InvalidNumber {
        /// Offending variable.
        key: &'static str,
        /// Parse failure.
        source: ParseIntError,
    },
    /// The default page size is zero or above the maximum.
    #[error("STRR_DEFAULT_PAGE_LIMIT ({default}) must be between 1 and STRR_MAX_PAGE_LIMIT ({max})")]
    PageLimits {
        /// Configured default page size.
        default: u32,
        /// Configured maximum page size.
        max: u32,
    },
    /// The registration term is not between one day and the maximum.
    #[error("STRR_REGISTRATION_TERM_DAYS must be between 1 and {MAX_REGISTRATION_TERM_DAYS}, got {0}")]
    RegistrationTerm(i64),
}
