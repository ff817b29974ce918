//! Authenticated, retrying file retrieval.
//!
//! This module provides the HTTP session used for both the listing page and
//! the individual files, and the batch retriever that streams matched files to
//! disk.
//!
//! # Features
//!
//! - One authenticated session per batch, shared across concurrent fetches
//! - Manual redirect handling with host-aware Authorization forwarding
//! - Bounded retry on any non-200 response, with optional exponential backoff
//! - Streaming writes through a 1 MiB buffer
//! - Per-file failures recorded in a [`DownloadReport`] instead of aborting
//!
//! # Example
//!
//! ```no_run
//! use oceandata_core::download::{AuthSession, RetryOutcome, RetryPolicy};
//! use oceandata_core::{Credentials, FetchSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = FetchSettings::default();
//! let session = AuthSession::open(&Credentials::new("user", "pass"), &settings.session_config())?;
//! match session.get_until_ok("https://example.com/file.nc", &RetryPolicy::default()).await? {
//!     RetryOutcome::Success { attempts, .. } => println!("ok after {attempts} attempts"),
//!     RetryOutcome::Exhausted { status, .. } => println!("gave up with HTTP {status}"),
//! }
//! session.close();
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod redirect;
mod report;
mod retriever;
mod retry;

pub use client::{AuthSession, RetryOutcome, SessionConfig};
pub use constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_AUTH_BROKER_HOST, DEFAULT_CHUNK_SIZE, DEFAULT_DOWNLOAD_BASE_URL,
    DEFAULT_MAX_REDIRECTS, READ_TIMEOUT_SECS,
};
pub use error::DownloadError;
pub use redirect::should_forward_authorization;
pub use report::{DownloadOutcome, DownloadReport, FailureReason, OutcomeStatus};
pub use retriever::FileRetriever;
pub use retry::{DEFAULT_MAX_ATTEMPTS, RetryDecision, RetryPolicy};

// Note: as elsewhere in the crate, no module-local Result alias.
// Use `Result<T, DownloadError>` explicitly in function signatures.
