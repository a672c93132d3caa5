//! Working-tree update from the release archive.
//!
//! The archive is a zip whose entries all live under one top-level directory
//! (`repo-master/` for a branch snapshot). It is downloaded, extracted into
//! the extraction directory, and that top-level directory is copied over the
//! working directory.

use bytes::Bytes;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zip::ZipArchive;

use super::errors::{ArchiveStage, UpdateError};
use super::logger::{UpdateEvent, UpdateLogger};
use super::orchestrator::StepOutcome;
use super::overlay::copy_tree;
use super::retry::RetryExecutor;
use crate::config::UpdaterConfig;
use crate::traits::HttpClient;

pub struct ArchiveUpdater {
    http: Arc<dyn HttpClient>,
    config: Arc<UpdaterConfig>,
    logger: UpdateLogger,
    retry: RetryExecutor,
}

impl ArchiveUpdater {
    pub fn new(http: Arc<dyn HttpClient>, config: Arc<UpdaterConfig>, logger: UpdateLogger) -> Self {
        let retry = RetryExecutor::new(logger.clone());
        Self {
            http,
            config,
            logger,
            retry,
        }
    }

    /// Download, extract and overlay. Never returns an error.
    ///
    /// A failure part way through the overlay leaves the files copied so far
    /// in place.
    pub async fn update(&self) -> StepOutcome {
        match self.try_update().await {
            Ok(()) => StepOutcome::Completed,
            Err(err) => {
                self.logger.log_error(&err, "Error updating manually");
                StepOutcome::Failed(err)
            }
        }
    }

    async fn try_update(&self) -> Result<(), UpdateError> {
        let archive = self.download().await?;

        let extract_dir = self.config.extract_dir.clone();
        let root = run_blocking(ArchiveStage::Extract, move || {
            extract_release(archive, &extract_dir)
        })
        .await?;
        self.logger.log(&UpdateEvent::ArchiveExtracted {
            root: root.display().to_string(),
        });

        let work_dir = self.config.work_dir.clone();
        let files_copied = run_blocking(ArchiveStage::Overlay, move || {
            copy_tree(&root, &work_dir).map_err(|e| UpdateError::archive(ArchiveStage::Overlay, e))
        })
        .await?;
        self.logger.log(&UpdateEvent::OverlayCompleted { files_copied });

        Ok(())
    }

    async fn download(&self) -> Result<Bytes, UpdateError> {
        const OPERATION: &str = "Downloading release archive";

        let http = &*self.http;
        let url = self.config.archive_url.as_str();
        let headers = &self.config.request_headers();
        let timeout = self.config.archive_timeout;

        let response = self
            .retry
            .execute(OPERATION, &self.config.retry_policy, move || async move {
                http.get(url, headers, timeout).await?.error_for_status()
            })
            .await
            .map_err(|exhausted| UpdateError::archive(ArchiveStage::Download, exhausted))?;

        self.logger.log(&UpdateEvent::DownloadCompleted {
            url: url.to_string(),
            size: response.body.len() as u64,
        });
        Ok(response.body)
    }
}

/// Run blocking archive work off the async runtime.
///
/// A panicking or cancelled task surfaces as [`UpdateError::Unexpected`].
async fn run_blocking<T, F>(stage: ArchiveStage, work: F) -> Result<T, UpdateError>
where
    F: FnOnce() -> Result<T, UpdateError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| UpdateError::Unexpected(format!("archive {} task failed: {}", stage, e)))?
}

/// Extract `archive` into `extract_dir`, replacing earlier extractions, and
/// return the path of its top-level directory.
pub fn extract_release(archive: Bytes, extract_dir: &Path) -> Result<PathBuf, UpdateError> {
    let mut zip = ZipArchive::new(Cursor::new(archive))
        .map_err(|e| UpdateError::archive(ArchiveStage::Extract, e))?;

    let root = extract_dir.join(archive_root(&mut zip)?);

    // Files left by an earlier extraction would otherwise be copied back.
    if root.is_dir() {
        std::fs::remove_dir_all(&root)
            .map_err(|e| UpdateError::archive(ArchiveStage::Extract, e))?;
    }

    zip.extract(extract_dir)
        .map_err(|e| UpdateError::archive(ArchiveStage::Extract, e))?;

    if !root.is_dir() {
        return Err(UpdateError::archive(
            ArchiveStage::ResolveRoot,
            format!("'{}' is not a directory", root.display()),
        ));
    }
    Ok(root)
}

/// First path component of the first entry.
fn archive_root(zip: &mut ZipArchive<Cursor<Bytes>>) -> Result<PathBuf, UpdateError> {
    if zip.len() == 0 {
        return Err(UpdateError::archive(ArchiveStage::ResolveRoot, "archive is empty"));
    }

    let first = zip
        .by_index(0)
        .map_err(|e| UpdateError::archive(ArchiveStage::ResolveRoot, e))?;
    let name = first.name().to_string();

    first
        .enclosed_name()
        .and_then(|path| path.components().next().map(|c| PathBuf::from(c.as_os_str())))
        .ok_or_else(|| {
            UpdateError::archive(
                ArchiveStage::ResolveRoot,
                format!("unsafe or empty entry name '{}'", name),
            )
        })
}
