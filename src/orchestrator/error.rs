//! Terminal errors of one orchestrated invocation.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::download::DownloadError;
use crate::filter::PatternError;
use crate::listing::ListingError;
use crate::partition::PartitionError;

/// Stable classification of an [`OrchestratorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The date token is not a known symbol or a real calendar date.
    InvalidDate,
    /// The base URL is empty or cannot be parsed.
    InvalidUrl,
    /// A filter pattern has a marker away from its ends.
    InvalidPattern,
    /// The listing page never returned 200, or exceeded the entry cap.
    ListingFetch,
    /// The listing page loaded but named no files.
    EmptyListing,
    /// The filter list was empty.
    NoFilesRequested,
    /// No listing entry matched any pattern.
    NoMatchingFiles,
    /// A connection, timeout, or redirect failure aborted the invocation.
    Session,
    /// The invocation exceeded its wall-clock limit.
    TimedOut,
}

impl ErrorKind {
    /// True when the request itself was at fault and resubmitting it unchanged
    /// cannot succeed.
    #[must_use]
    pub fn is_caller_error(self) -> bool {
        matches!(
            self,
            Self::InvalidDate
                | Self::InvalidUrl
                | Self::InvalidPattern
                | Self::EmptyListing
                | Self::NoFilesRequested
                | Self::NoMatchingFiles
        )
    }

    /// Short snake_case label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidDate => "invalid_date",
            Self::InvalidUrl => "invalid_url",
            Self::InvalidPattern => "invalid_pattern",
            Self::ListingFetch => "listing_fetch",
            Self::EmptyListing => "empty_listing",
            Self::NoFilesRequested => "no_files_requested",
            Self::NoMatchingFiles => "no_matching_files",
            Self::Session => "session",
            Self::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that end an invocation before a [`DownloadReport`](crate::DownloadReport)
/// can be produced.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Bad date token or base URL.
    #[error(transparent)]
    Partition(#[from] PartitionError),

    /// A filter pattern failed classification.
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    /// The listing could not be fetched or was empty.
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// The filter list was empty.
    #[error("no files requested: filter list is empty")]
    NoFilesRequested,

    /// No listing entry matched any filter.
    #[error("no files in {url} match filters [{}]", patterns.join(", "))]
    NoMatchingFiles {
        /// The listing URL.
        url: String,
        /// The filters as supplied.
        patterns: Vec<String>,
    },

    /// The retrieval batch aborted on a session-level failure.
    #[error("retrieval aborted: {0}")]
    Retrieval(#[source] DownloadError),

    /// The invocation exceeded its wall-clock limit.
    #[error("invocation timed out after {}s", limit.as_secs())]
    TimedOut {
        /// Configured limit.
        limit: Duration,
    },
}

impl OrchestratorError {
    /// Stable kind for mapping to user-visible status.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Partition(PartitionError::InvalidDate { .. }) => ErrorKind::InvalidDate,
            Self::Partition(PartitionError::InvalidUrl { .. }) => ErrorKind::InvalidUrl,
            Self::InvalidPattern(_) => ErrorKind::InvalidPattern,
            Self::Listing(ListingError::Empty { .. }) => ErrorKind::EmptyListing,
            Self::Listing(ListingError::Session { .. }) | Self::Retrieval(_) => ErrorKind::Session,
            Self::Listing(_) => ErrorKind::ListingFetch,
            Self::NoFilesRequested => ErrorKind::NoFilesRequested,
            Self::NoMatchingFiles { .. } => ErrorKind::NoMatchingFiles,
            Self::TimedOut { .. } => ErrorKind::TimedOut,
        }
    }
}
