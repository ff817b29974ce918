//! Authenticated fetch of a directory listing page.

use tracing::{info, instrument, warn};

use super::{Listing, ListingError, parse_listing};
use crate::config::{Credentials, FetchSettings};
use crate::download::{AuthSession, DownloadError, RetryOutcome, RetryPolicy, SessionConfig};

/// Fetches and parses listing pages.
#[derive(Debug, Clone)]
pub struct ListingFetcher {
    retry_policy: RetryPolicy,
    session_config: SessionConfig,
    max_entries: Option<usize>,
}

impl ListingFetcher {
    /// Creates a fetcher from fetch settings.
    #[must_use]
    pub fn new(settings: &FetchSettings) -> Self {
        Self {
            retry_policy: settings.listing_retry.clone(),
            session_config: settings.session_config(),
            max_entries: settings.max_listing_entries,
        }
    }

    /// Fetches `url` over its own session and returns its filenames.
    ///
    /// Any non-200 response is retried up to the policy's attempt limit.
    ///
    /// # Errors
    ///
    /// - [`ListingError::Fetch`] when every attempt returned a non-200 status
    /// - [`ListingError::Session`] on transport failures
    /// - [`ListingError::Empty`] when the page has no entries
    /// - [`ListingError::TooLarge`] when the parsed page names more entries
    ///   than the cap; the whole body has been read by then
    #[instrument(skip(self, credentials))]
    pub async fn fetch(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<Listing, ListingError> {
        let session = AuthSession::open(credentials, &self.session_config)
            .map_err(|e| ListingError::session(url, e))?;
        let result = self.fetch_with_session(&session, url).await;
        session.close();
        result
    }

    async fn fetch_with_session(
        &self,
        session: &AuthSession,
        url: &str,
    ) -> Result<Listing, ListingError> {
        let outcome = session
            .get_until_ok(url, &self.retry_policy)
            .await
            .map_err(|e| ListingError::session(url, e))?;

        let (response, attempts) = match outcome {
            RetryOutcome::Success { response, attempts } => (response, attempts),
            RetryOutcome::Exhausted { status, attempts } => {
                warn!(status, attempts, "listing request failed");
                return Err(ListingError::Fetch {
                    url: url.to_string(),
                    status,
                    attempts,
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| ListingError::session(url, DownloadError::request(url, e)))?;
        let entries = parse_listing(&body)?;

        if entries.is_empty() {
            warn!("listing page has no entries");
            return Err(ListingError::empty(url));
        }
        if let Some(limit) = self.max_entries
            && entries.len() > limit
        {
            return Err(ListingError::TooLarge {
                url: url.to_string(),
                entries: entries.len(),
                limit,
            });
        }

        info!(entries = entries.len(), attempts, "fetched listing");
        Ok(Listing::new(url, entries))
    }
}
