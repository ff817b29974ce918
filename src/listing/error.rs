//! Error types for listing retrieval.

use thiserror::Error;

use crate::download::DownloadError;

/// Errors raised while fetching or parsing a directory listing.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The listing never returned `200 OK`.
    #[error("listing {url} returned HTTP {status} after {attempts} attempts")]
    Fetch {
        /// The listing URL.
        url: String,
        /// Status of the final attempt.
        status: u16,
        /// Attempts made.
        attempts: u32,
    },

    /// The listing endpoint could not be reached.
    #[error("listing {url} unreachable: {source}")]
    Session {
        /// The listing URL.
        url: String,
        /// The session-level failure.
        #[source]
        source: DownloadError,
    },

    /// The page loaded but its table holds no entries.
    #[error("listing {url} is empty: no table rows found")]
    Empty {
        /// The listing URL.
        url: String,
    },

    /// The listing holds more entries than allowed.
    #[error("listing {url} has {entries} entries, more than the limit of {limit}")]
    TooLarge {
        /// The listing URL.
        url: String,
        /// Entries found.
        entries: usize,
        /// Configured limit.
        limit: usize,
    },

    /// A CSS selector failed to compile.
    #[error("invalid selector '{selector}': {reason}")]
    Selector {
        /// The selector source.
        selector: &'static str,
        /// Parser message.
        reason: String,
    },
}

impl ListingError {
    /// Wraps a session-level failure for `url`.
    pub fn session(url: impl Into<String>, source: DownloadError) -> Self {
        Self::Session {
            url: url.into(),
            source,
        }
    }

    /// Creates an empty listing error.
    pub fn empty(url: impl Into<String>) -> Self {
        Self::Empty { url: url.into() }
    }
}
