//! Core configuration: account credentials and fetch settings.
//!
//! Both are plain values built once at startup and injected into
//! [`DownloadOrchestrator`](crate::DownloadOrchestrator). Nothing here reads
//! the environment; the binary does that.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::download::{
    CONNECT_TIMEOUT_SECS, DEFAULT_AUTH_BROKER_HOST, DEFAULT_CHUNK_SIZE, DEFAULT_DOWNLOAD_BASE_URL,
    DEFAULT_MAX_REDIRECTS, READ_TIMEOUT_SECS, RetryPolicy, SessionConfig,
};

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 16;

/// Default number of files fetched at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Account used to authenticate every outbound session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Account name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Account password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Invalid fetch settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Concurrency outside `MIN_CONCURRENCY..=MAX_CONCURRENCY`.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The rejected value.
        value: usize,
    },

    /// A zero write buffer size.
    #[error("invalid chunk size: must be greater than zero")]
    InvalidChunkSize,

    /// A setting that must be non-empty was empty.
    #[error("invalid setting `{field}`: must not be empty")]
    EmptyField {
        /// Name of the setting.
        field: &'static str,
    },

    /// Credentials without a username.
    #[error("invalid credentials: username must not be empty")]
    MissingUsername,
}

/// Tunables for one orchestrator instance.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    /// Base URL individual files are fetched from.
    pub download_base_url: String,
    /// Host trusted to receive credentials across redirects.
    pub auth_broker_host: String,
    /// Retry policy for the listing request.
    pub listing_retry: RetryPolicy,
    /// Retry policy for each file request.
    pub file_retry: RetryPolicy,
    /// Number of files fetched at once.
    pub concurrency: usize,
    /// Write buffer size when streaming a file to disk.
    pub chunk_size: usize,
    /// HTTP connect timeout.
    pub connect_timeout: Duration,
    /// HTTP read timeout.
    pub read_timeout: Duration,
    /// Redirect hops followed per request.
    pub max_redirects: usize,
    /// Wall-clock ceiling for a whole invocation.
    pub invocation_timeout: Option<Duration>,
    /// Most entries a listing may name.
    ///
    /// Checked after the page is read and parsed, so it bounds the entry
    /// count, not the bytes held while parsing.
    pub max_listing_entries: Option<usize>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            download_base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
            auth_broker_host: DEFAULT_AUTH_BROKER_HOST.to_string(),
            listing_retry: RetryPolicy::default(),
            file_retry: RetryPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            invocation_timeout: None,
            max_listing_entries: None,
        }
    }
}

impl FetchSettings {
    /// Checks ranges and required fields.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&self.concurrency) {
            return Err(ConfigError::InvalidConcurrency {
                value: self.concurrency,
            });
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        if self.download_base_url.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "download_base_url",
            });
        }
        if self.auth_broker_host.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "auth_broker_host",
            });
        }
        Ok(())
    }

    /// Session parameters derived from these settings.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            auth_broker_host: self.auth_broker_host.clone(),
            connect_timeout: self.connect_timeout,
            read_timeout: self.read_timeout,
            max_redirects: self.max_redirects,
        }
    }
}
