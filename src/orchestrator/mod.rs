//! End-to-end invocation: date → listing → filter → retrieval.
//!
//! [`DownloadOrchestrator`] owns the injected [`Credentials`] and
//! [`FetchSettings`] and runs one strictly sequential pipeline per call:
//!
//! 1. resolve the date token to `(year, day-of-year)`
//! 2. build the listing URL for that partition
//! 3. reject an empty filter list (no network traffic)
//! 4. classify every filter pattern
//! 5. fetch and parse the listing
//! 6. build the matched set, rejecting an empty one
//! 7. retrieve the matched files into the destination directory
//!
//! Partial success is returned as a [`DownloadReport`] with failed outcomes,
//! not as an error.

mod error;
mod request;

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

pub use error::{ErrorKind, OrchestratorError};
pub use request::DownloadRequest;

use crate::config::{ConfigError, Credentials, FetchSettings};
use crate::download::{DownloadReport, FileRetriever};
use crate::filter::{MatchedSet, classify_all};
use crate::listing::ListingFetcher;
use crate::partition::{build_listing_url, resolve_date};

/// Runs download invocations against one account.
#[derive(Debug, Clone)]
pub struct DownloadOrchestrator {
    settings: FetchSettings,
    credentials: Credentials,
}

impl DownloadOrchestrator {
    /// Creates an orchestrator after validating its inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for out-of-range settings or an empty username.
    pub fn new(settings: FetchSettings, credentials: Credentials) -> Result<Self, ConfigError> {
        settings.validate()?;
        if credentials.username().trim().is_empty() {
            return Err(ConfigError::MissingUsername);
        }
        Ok(Self {
            settings,
            credentials,
        })
    }

    /// Runs one invocation with "today" taken from the system clock.
    ///
    /// # Errors
    ///
    /// Returns the [`OrchestratorError`] that terminated the invocation.
    pub async fn run<S: AsRef<str>>(
        &self,
        base_url: &str,
        filter_list: &[S],
        filter_date: &str,
        destination_dir: &Path,
    ) -> Result<DownloadReport, OrchestratorError> {
        self.run_at(base_url, filter_list, filter_date, destination_dir, Utc::now())
            .await
    }

    /// Runs one [`DownloadRequest`].
    ///
    /// # Errors
    ///
    /// Returns the [`OrchestratorError`] that terminated the invocation.
    pub async fn run_request(
        &self,
        request: &DownloadRequest,
        destination_dir: &Path,
    ) -> Result<DownloadReport, OrchestratorError> {
        self.run(
            &request.base_url,
            &request.filter_list,
            &request.filter_date,
            destination_dir,
        )
        .await
    }

    /// Runs one invocation resolving symbolic dates against `reference`.
    ///
    /// # Errors
    ///
    /// Returns the [`OrchestratorError`] that terminated the invocation, or
    /// [`OrchestratorError::TimedOut`] when the invocation timeout elapses.
    pub async fn run_at<S: AsRef<str>>(
        &self,
        base_url: &str,
        filter_list: &[S],
        filter_date: &str,
        destination_dir: &Path,
        reference: DateTime<Utc>,
    ) -> Result<DownloadReport, OrchestratorError> {
        let pipeline =
            self.pipeline(base_url, filter_list, filter_date, destination_dir, reference);
        with_limit(self.settings.invocation_timeout, pipeline).await
    }

    #[instrument(skip(self, filter_list, reference), fields(filters = filter_list.len()))]
    async fn pipeline<S: AsRef<str>>(
        &self,
        base_url: &str,
        filter_list: &[S],
        filter_date: &str,
        destination_dir: &Path,
        reference: DateTime<Utc>,
    ) -> Result<DownloadReport, OrchestratorError> {
        let date = resolve_date(filter_date, reference)?;
        info!(%date, "resolved date");

        let listing_url = build_listing_url(base_url, date.year, date.day_of_year)?;

        if filter_list.is_empty() {
            return Err(OrchestratorError::NoFilesRequested);
        }
        let patterns = classify_all(filter_list)?;

        let listing = ListingFetcher::new(&self.settings)
            .fetch(&listing_url, &self.credentials)
            .await?;
        info!(url = %listing_url, entries = listing.len(), "listing retrieved");

        let matched = MatchedSet::build(&patterns, listing.entries());
        info!(matched = matched.len(), "filter completed");
        if matched.is_empty() {
            return Err(OrchestratorError::NoMatchingFiles {
                url: listing_url,
                patterns: filter_list.iter().map(|p| p.as_ref().to_string()).collect(),
            });
        }

        FileRetriever::new(&self.settings)
            .retrieve_all(&matched, &self.credentials, destination_dir)
            .await
            .map_err(OrchestratorError::Retrieval)
    }
}

async fn with_limit<F>(
    limit: Option<Duration>,
    future: F,
) -> Result<DownloadReport, OrchestratorError>
where
    F: Future<Output = Result<DownloadReport, OrchestratorError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, future)
            .await
            .map_err(|_| OrchestratorError::TimedOut { limit })?,
        None => future.await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn orchestrator() -> DownloadOrchestrator {
        DownloadOrchestrator::new(FetchSettings::default(), Credentials::new("user", "pass"))
            .unwrap()
    }

    #[test]
    fn test_new_rejects_empty_username() {
        let result =
            DownloadOrchestrator::new(FetchSettings::default(), Credentials::new(" ", "x"));
        assert_eq!(result.unwrap_err(), ConfigError::MissingUsername);
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let settings = FetchSettings {
            concurrency: 0,
            ..FetchSettings::default()
        };
        let result = DownloadOrchestrator::new(settings, Credentials::new("user", "pass"));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidConcurrency { value: 0 }
        );
    }

    // These fail before any network traffic, so the unroutable base is never contacted.

    #[tokio::test]
    async fn test_empty_filter_list_fails_without_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let err = orchestrator()
            .run("http://127.0.0.1:9/base", &[] as &[&str], "20230628", dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoFilesRequested);
    }

    #[tokio::test]
    async fn test_invalid_date_fails_first() {
        let dir = tempfile::tempdir().unwrap();
        let err = orchestrator()
            .run("http://127.0.0.1:9/base", &["*"], "2023-13-45", dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDate);
    }

    #[tokio::test]
    async fn test_empty_base_url_is_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let err = orchestrator()
            .run("", &["*"], "today", dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
    }

    #[tokio::test]
    async fn test_interior_marker_rejected_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let err = orchestrator()
            .run("http://127.0.0.1:9/base", &["a*b*c"], "today", dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
    }

    #[tokio::test]
    async fn test_with_limit_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(DownloadReport::from_outcomes(Vec::new()))
        };
        let err = with_limit(Some(Duration::from_millis(10)), slow)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimedOut);
    }

    #[tokio::test]
    async fn test_with_limit_passes_through_without_limit() {
        let ready = async { Ok(DownloadReport::from_outcomes(Vec::new())) };
        let report = with_limit(None, ready).await.unwrap();
        assert_eq!(report.requested(), 0);
    }
}
