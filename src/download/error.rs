//! Error types for the download module.
//!
//! A failure to send a request is session-level. A non-200 status after all
//! retries, and a body or write failure after a 200, are recorded by the
//! caller as per-file outcomes instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to the remote server or writing a file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// File system error while writing a download.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The URL is malformed, or a redirect pointed somewhere unparseable.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The redirect chain did not settle within the hop limit.
    #[error("too many redirects requesting {url} (limit {limit})")]
    TooManyRedirects {
        /// The originally requested URL.
        url: String,
        /// Configured hop limit.
        limit: usize,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP session: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Maps a reqwest send/body error, promoting timeouts to [`DownloadError::Timeout`].
    pub fn request(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::network(url, source)
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a redirect limit error.
    pub fn too_many_redirects(url: impl Into<String>, limit: usize) -> Self {
        Self::TooManyRedirects {
            url: url.into(),
            limit,
        }
    }

    /// Creates a client build error.
    pub fn client_build(source: reqwest::Error) -> Self {
        Self::ClientBuild { source }
    }
}
