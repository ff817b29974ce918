//! Batch retrieval of matched files over one shared session.
//!
//! Files are fetched with bounded concurrency. Outcomes are reported in
//! matched-set order regardless of completion order.
//!
//! Failure handling:
//! - non-200 after all attempts: recorded, batch continues
//! - local write error: recorded, partial file removed, batch continues
//! - body fails after a 200 (truncation, reset, read timeout): recorded,
//!   partial file removed, batch continues
//! - request cannot be sent (transport, timeout, redirect loop): aborts the
//!   batch; files still streaming are cancelled and their partial files removed

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::{StreamExt, TryStreamExt, stream};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, error, info, instrument, warn};

use super::client::{AuthSession, RetryOutcome, SessionConfig};
use super::error::DownloadError;
use super::report::{DownloadOutcome, DownloadReport, FailureReason};
use super::retry::RetryPolicy;
use crate::config::{Credentials, FetchSettings};
use crate::filter::MatchedSet;
use crate::partition::build_file_url;

/// Fetches every file of a [`MatchedSet`] into a destination directory.
#[derive(Debug, Clone)]
pub struct FileRetriever {
    download_base_url: String,
    retry_policy: RetryPolicy,
    concurrency: usize,
    chunk_size: usize,
    session_config: SessionConfig,
}

impl FileRetriever {
    /// Creates a retriever from fetch settings.
    #[must_use]
    pub fn new(settings: &FetchSettings) -> Self {
        Self {
            download_base_url: settings.download_base_url.clone(),
            retry_policy: settings.file_retry.clone(),
            concurrency: settings.concurrency.max(1),
            chunk_size: settings.chunk_size.max(1),
            session_config: settings.session_config(),
        }
    }

    /// Retrieves all matched files, opening and closing one session.
    ///
    /// # Errors
    ///
    /// Returns a session-level [`DownloadError`]; per-file failures are in the report.
    #[instrument(skip_all, fields(files = matched.len(), dest = %destination_dir.display()))]
    pub async fn retrieve_all(
        &self,
        matched: &MatchedSet,
        credentials: &Credentials,
        destination_dir: &Path,
    ) -> Result<DownloadReport, DownloadError> {
        let requested = matched.len();
        let session = AuthSession::open(credentials, &self.session_config)?;

        if let Err(e) = tokio::fs::create_dir_all(destination_dir).await {
            warn!(error = %e, "could not create destination directory");
        }

        let written = AtomicUsize::new(0);
        let result = self
            .retrieve_with_session(&session, matched, destination_dir, &written)
            .await;
        session.close();

        let downloaded = written.load(Ordering::SeqCst);
        match &result {
            Ok(report) => info!(
                succeeded = report.succeeded(),
                failed = report.failed(),
                "{downloaded} of {requested} files were downloaded"
            ),
            Err(e) => error!(
                error = %e,
                "{downloaded} of {requested} files were downloaded before abort"
            ),
        }
        result
    }

    async fn retrieve_with_session(
        &self,
        session: &AuthSession,
        matched: &MatchedSet,
        destination_dir: &Path,
        written: &AtomicUsize,
    ) -> Result<DownloadReport, DownloadError> {
        let outcomes: Vec<DownloadOutcome> = stream::iter(matched.iter())
            .map(|name| async move {
                let outcome = self.retrieve_named(session, name, destination_dir).await?;
                if outcome.is_success() {
                    written.fetch_add(1, Ordering::SeqCst);
                }
                Ok::<_, DownloadError>(outcome)
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(DownloadReport::from_outcomes(outcomes))
    }

    async fn retrieve_named(
        &self,
        session: &AuthSession,
        name: &str,
        destination_dir: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let url = build_file_url(&self.download_base_url, name);
        let dest_path = destination_dir.join(name);

        if !is_plain_file_name(name) {
            warn!(name, "refusing listing entry that is not a plain file name");
            return Ok(DownloadOutcome::failed(
                name,
                url,
                dest_path,
                0,
                FailureReason::UnsafeName,
            ));
        }

        self.retrieve_one(session, &url, &dest_path).await
    }

    /// Fetches one file to `dest_path`, overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns a session-level [`DownloadError`] when the request cannot be
    /// sent. Non-200 exhaustion, body stream errors and write failures come
    /// back as failed outcomes.
    #[instrument(skip(self, session), fields(path = %dest_path.display()))]
    pub async fn retrieve_one(
        &self,
        session: &AuthSession,
        url: &str,
        dest_path: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let name = dest_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("starting file download");

        let (response, attempts) = match session.get_until_ok(url, &self.retry_policy).await? {
            RetryOutcome::Success { response, attempts } => (response, attempts),
            RetryOutcome::Exhausted { status, attempts } => {
                error!(status, attempts, "response error, file not downloaded");
                return Ok(DownloadOutcome::failed(
                    name,
                    url,
                    dest_path,
                    attempts,
                    FailureReason::HttpStatus { status },
                ));
            }
        };

        match stream_to_file(response, url, dest_path, self.chunk_size).await {
            Ok(bytes) => {
                info!(bytes, attempts, "finished file download");
                Ok(DownloadOutcome::succeeded(
                    name, url, dest_path, attempts, bytes,
                ))
            }
            Err(DownloadError::Io { source, .. }) => {
                error!(error = %source, "file write error");
                Ok(DownloadOutcome::failed(
                    name,
                    url,
                    dest_path,
                    attempts,
                    FailureReason::Write {
                        message: source.to_string(),
                    },
                ))
            }
            Err(e) => {
                error!(error = %e, "transfer error, file not downloaded");
                Ok(DownloadOutcome::failed(
                    name,
                    url,
                    dest_path,
                    attempts,
                    FailureReason::Transfer {
                        message: e.to_string(),
                    },
                ))
            }
        }
    }
}

/// Streams a response body to `dest_path` through a `chunk_size` buffer,
/// returning bytes written.
///
/// The file is removed unless the whole body is written and flushed, including
/// when this future is dropped mid-stream.
async fn stream_to_file(
    response: reqwest::Response,
    url: &str,
    dest_path: &Path,
    chunk_size: usize,
) -> Result<u64, DownloadError> {
    let file = File::create(dest_path)
        .await
        .map_err(|e| DownloadError::io(dest_path, e))?;
    // Declared before the writer so the file handle closes before removal.
    let partial = PartialFile::new(dest_path);
    let mut writer = BufWriter::with_capacity(chunk_size, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::request(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(dest_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(dest_path, e))?;

    partial.keep();
    Ok(bytes_written)
}

/// Deletes an unfinished download when dropped before [`PartialFile::keep`].
struct PartialFile<'a> {
    path: &'a Path,
    complete: bool,
}

impl<'a> PartialFile<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            complete: false,
        }
    }

    fn keep(mut self) {
        self.complete = true;
    }
}

impl Drop for PartialFile<'_> {
    fn drop(&mut self) {
        if self.complete {
            return;
        }
        debug!(path = %self.path.display(), "removing partial file");
        if let Err(e) = std::fs::remove_file(self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "could not remove partial file");
        }
    }
}

/// A single path component that cannot climb out of the destination.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("GMAO_MERRA2.20230628T100000.MET.nc"));
        assert!(is_plain_file_name("..hidden"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name("."));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../etc/passwd"));
        assert!(!is_plain_file_name("sub/file.nc"));
        assert!(!is_plain_file_name("sub\\file.nc"));
    }

    #[test]
    fn test_partial_file_removed_unless_kept() {
        let dir = tempfile::tempdir().unwrap();
        let dropped = dir.path().join("dropped.nc");
        let kept = dir.path().join("kept.nc");
        std::fs::write(&dropped, b"half").unwrap();
        std::fs::write(&kept, b"whole").unwrap();

        drop(PartialFile::new(&dropped));
        PartialFile::new(&kept).keep();

        assert!(!dropped.exists());
        assert_eq!(std::fs::read(&kept).unwrap(), b"whole");
    }

    #[test]
    fn test_partial_file_already_gone_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        drop(PartialFile::new(&dir.path().join("never-created.nc")));
    }

    #[test]
    fn test_retriever_clamps_settings() {
        let settings = FetchSettings {
            concurrency: 0,
            chunk_size: 0,
            ..FetchSettings::default()
        };
        let retriever = FileRetriever::new(&settings);
        assert_eq!(retriever.concurrency, 1);
        assert_eq!(retriever.chunk_size, 1);
    }
}
