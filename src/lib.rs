//! Oceandata Downloader Core Library
//!
//! Fetches the files published for one day of a date-partitioned remote
//! directory tree: resolve a date, read that day's listing page, filter the
//! listing by filename patterns, and download the matches with an
//! authenticated, retrying HTTP session.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`partition`] - Date tokens and `{base}/{year}/{day}` URL construction
//! - [`filter`] - Wildcard pattern classification and matched-set building
//! - [`listing`] - Listing page fetch and HTML table parsing
//! - [`download`] - Authenticated session, retry policy, and file retrieval
//! - [`orchestrator`] - The end-to-end pipeline and its terminal errors
//! - [`config`] - Credentials and fetch settings injected at construction

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod filter;
pub mod listing;
pub mod orchestrator;
pub mod partition;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, Credentials, DEFAULT_CONCURRENCY, FetchSettings, MAX_CONCURRENCY};
pub use download::{
    DEFAULT_MAX_ATTEMPTS, DownloadError, DownloadOutcome, DownloadReport, FailureReason,
    RetryPolicy,
};
pub use filter::{FilterPattern, MatchedSet, PatternError, classify};
pub use listing::{Listing, ListingError};
pub use orchestrator::{DownloadOrchestrator, DownloadRequest, ErrorKind, OrchestratorError};
pub use partition::{DateToken, PartitionError, ResolvedDate};
