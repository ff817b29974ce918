//! Authenticated HTTP session.
//!
//! [`AuthSession`] wraps a `reqwest` client with a cookie store and Basic
//! credentials. Redirects are followed by hand so the Authorization header can
//! be dropped hop by hop (see [`should_forward_authorization`]).

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, redirect};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::DownloadError;
use super::redirect::{redirect_target, should_forward_authorization};
use super::retry::{RetryDecision, RetryPolicy};
use crate::config::Credentials;
use crate::user_agent;

/// Parameters for opening an [`AuthSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Host trusted to receive credentials across redirects.
    pub auth_broker_host: String,
    /// HTTP connect timeout.
    pub connect_timeout: Duration,
    /// HTTP read timeout.
    pub read_timeout: Duration,
    /// Redirect hops followed per request.
    pub max_redirects: usize,
}

/// Result of a bounded retry loop.
///
/// Either a `200 OK` response or the status of the last attempt. Callers must
/// handle both; there is no unchecked response to fall through to.
#[derive(Debug)]
pub enum RetryOutcome {
    /// A `200 OK` response, ready to be consumed.
    Success {
        /// The successful response.
        response: Response,
        /// Attempts made, including the successful one.
        attempts: u32,
    },
    /// Every attempt returned something other than `200 OK`.
    Exhausted {
        /// Status of the final attempt.
        status: u16,
        /// Attempts made.
        attempts: u32,
    },
}

/// HTTP session authenticated with one account.
///
/// Cheap to clone and safe to share between concurrent requests; clones share
/// the connection pool and cookie store.
#[derive(Debug, Clone)]
pub struct AuthSession {
    client: Client,
    credentials: Credentials,
    auth_broker_host: String,
    max_redirects: usize,
}

impl AuthSession {
    /// Opens a session for `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    #[instrument(level = "debug", skip(credentials, config), fields(user = credentials.username()))]
    pub fn open(credentials: &Credentials, config: &SessionConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .gzip(true)
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(DownloadError::client_build)?;

        info!(user = credentials.username(), "opened authenticated session");

        Ok(Self {
            client,
            credentials: credentials.clone(),
            auth_broker_host: config.auth_broker_host.clone(),
            max_redirects: config.max_redirects,
        })
    }

    /// Issues one GET, following redirects.
    ///
    /// Non-success statuses are returned as responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns a [`DownloadError`] for unparseable URLs, transport failures,
    /// timeouts, and redirect loops.
    pub async fn get(&self, url: &str) -> Result<Response, DownloadError> {
        let mut current = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        let mut send_auth = true;

        for hop in 0..=self.max_redirects {
            let mut request = self.client.get(current.clone());
            if send_auth {
                request = request.basic_auth(
                    self.credentials.username(),
                    Some(self.credentials.password()),
                );
            }

            let response = request
                .send()
                .await
                .map_err(|e| DownloadError::request(current.as_str(), e))?;

            let Some(next) = redirect_target(&current, &response) else {
                return Ok(response);
            };

            send_auth = send_auth
                && should_forward_authorization(
                    current.host_str(),
                    next.host_str(),
                    &self.auth_broker_host,
                );
            debug!(
                hop,
                status = response.status().as_u16(),
                from = %current,
                to = %next,
                forward_auth = send_auth,
                "following redirect"
            );
            current = next;
        }

        Err(DownloadError::too_many_redirects(url, self.max_redirects))
    }

    /// Repeats [`get`](Self::get) until a `200 OK` or the policy gives up.
    ///
    /// # Errors
    ///
    /// Propagates the first session-level [`DownloadError`]; those are not retried.
    #[instrument(skip(self, policy), fields(max_attempts = policy.max_attempts()))]
    pub async fn get_until_ok(
        &self,
        url: &str,
        policy: &RetryPolicy,
    ) -> Result<RetryOutcome, DownloadError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(attempt, "sending request");

            let response = self.get(url).await?;
            let status = response.status();
            if status == StatusCode::OK {
                return Ok(RetryOutcome::Success {
                    response,
                    attempts: attempt,
                });
            }

            match policy.should_retry(attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next_attempt,
                } => {
                    info!(
                        url,
                        status = status.as_u16(),
                        attempt = next_attempt,
                        max_attempts = policy.max_attempts(),
                        delay_ms = delay.as_millis(),
                        "retrying request"
                    );
                    drop(response);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                RetryDecision::DoNotRetry { reason } => {
                    warn!(url, status = status.as_u16(), attempts = attempt, %reason, "giving up");
                    return Ok(RetryOutcome::Exhausted {
                        status: status.as_u16(),
                        attempts: attempt,
                    });
                }
            }
        }
    }

    /// Ends the session, releasing pooled connections and cookies.
    pub fn close(self) {
        debug!(user = self.credentials.username(), "closed authenticated session");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            auth_broker_host: "urs.earthdata.nasa.gov".into(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
            max_redirects: 10,
        }
    }

    #[test]
    fn test_open_session_succeeds() {
        let session = AuthSession::open(&Credentials::new("user", "pass"), &config());
        assert!(session.is_ok());
        session.unwrap().close();
    }

    #[tokio::test]
    async fn test_get_rejects_unparseable_url() {
        let session = AuthSession::open(&Credentials::new("user", "pass"), &config()).unwrap();
        let result = session.get("not a url").await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }
}
