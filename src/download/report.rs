//! Per-file outcomes and the batch report.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Why a single file was not retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The last attempt returned this non-200 status.
    HttpStatus {
        /// Final HTTP status code.
        status: u16,
    },
    /// Writing the body to disk failed.
    Write {
        /// The IO error message.
        message: String,
    },
    /// The body stream failed after a 200 response.
    Transfer {
        /// The stream error message.
        message: String,
    },
    /// The listing name would escape the destination directory.
    UnsafeName,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus { status } => write!(f, "HTTP {status} after all attempts"),
            Self::Write { message } => write!(f, "file write error: {message}"),
            Self::Transfer { message } => write!(f, "transfer interrupted: {message}"),
            Self::UnsafeName => f.write_str("filename is not a plain file name"),
        }
    }
}

/// Terminal state of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The body was written in full.
    Succeeded {
        /// Bytes written to disk.
        bytes_written: u64,
    },
    /// The file was not retrieved.
    Failed {
        /// Cause of the failure.
        reason: FailureReason,
    },
}

/// Result of retrieving one matched file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    /// Remote filename from the listing.
    pub name: String,
    /// URL the file was requested from.
    pub url: String,
    /// Local destination path.
    pub path: PathBuf,
    /// Requests made for this file.
    pub attempts: u32,
    /// Success or failure detail.
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl DownloadOutcome {
    /// Creates a success outcome.
    pub fn succeeded(
        name: impl Into<String>,
        url: impl Into<String>,
        path: impl Into<PathBuf>,
        attempts: u32,
        bytes_written: u64,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            path: path.into(),
            attempts,
            status: OutcomeStatus::Succeeded { bytes_written },
        }
    }

    /// Creates a failure outcome.
    pub fn failed(
        name: impl Into<String>,
        url: impl Into<String>,
        path: impl Into<PathBuf>,
        attempts: u32,
        reason: FailureReason,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            path: path.into(),
            attempts,
            status: OutcomeStatus::Failed { reason },
        }
    }

    /// Returns `true` if the file was written.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded { .. })
    }

    /// Bytes written, for successful outcomes.
    #[must_use]
    pub fn bytes_written(&self) -> Option<u64> {
        match self.status {
            OutcomeStatus::Succeeded { bytes_written } => Some(bytes_written),
            OutcomeStatus::Failed { .. } => None,
        }
    }

    /// Failure cause, for failed outcomes.
    #[must_use]
    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.status {
            OutcomeStatus::Succeeded { .. } => None,
            OutcomeStatus::Failed { reason } => Some(reason),
        }
    }
}

/// Outcomes of one invocation, in matched-set order, with counts.
///
/// `succeeded + failed == requested` always holds: counts are derived from
/// the outcomes at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadReport {
    requested: usize,
    succeeded: usize,
    failed: usize,
    outcomes: Vec<DownloadOutcome>,
}

impl DownloadReport {
    /// Builds a report from ordered outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<DownloadOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            requested: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }

    /// Files attempted.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Files written.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Files not written.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Per-file outcomes in matched-set order.
    #[must_use]
    pub fn outcomes(&self) -> &[DownloadOutcome] {
        &self.outcomes
    }

    /// Total bytes written across successful files.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.outcomes
            .iter()
            .filter_map(DownloadOutcome::bytes_written)
            .sum()
    }

    /// Returns `true` when every requested file succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }

    /// Iterates failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}
