//! Error types for date and URL resolution.

use thiserror::Error;

/// Errors raised while turning request input into a partition address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// The date token is neither symbolic nor a valid calendar date.
    #[error("invalid date '{input}': {reason}")]
    InvalidDate {
        /// The raw token supplied by the caller.
        input: String,
        /// Why the token was rejected.
        reason: String,
    },

    /// The base URL is empty.
    #[error("invalid base URL '{url}': must not be empty")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
    },
}

impl PartitionError {
    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}
