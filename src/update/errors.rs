//! Unified error handling for update operations.
//!
//! This module provides:
//! - One error type covering every failure of an update session
//! - Error categorization for handling decisions
//! - Stable error codes for log lines
//! - User-friendly messages for display

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::traits::{HttpError, ProcessError, PromptError};

/// Represents the category of an update error for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateErrorCategory {
    /// Local manifest missing or unreadable
    LocalManifest,
    /// Network-related errors (connection, timeout, bad status)
    Network,
    /// Version-control update failed
    Vcs,
    /// Archive download, extraction or overlay failed
    Archive,
    /// Dependency install failed
    Install,
    /// Replacement process could not be started
    Restart,
    /// Anything else
    Unexpected,
}

impl UpdateErrorCategory {
    /// Returns a short label for the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateErrorCategory::LocalManifest => "local_manifest",
            UpdateErrorCategory::Network => "network",
            UpdateErrorCategory::Vcs => "vcs",
            UpdateErrorCategory::Archive => "archive",
            UpdateErrorCategory::Install => "install",
            UpdateErrorCategory::Restart => "restart",
            UpdateErrorCategory::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for UpdateErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every failure an update session can report.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The local manifest is missing, unreadable or has no `version`.
    #[error("Failed to read local manifest '{}': {message}", path.display())]
    LocalRead { path: PathBuf, message: String },

    /// A single network attempt failed.
    #[error("{0}")]
    Network(HttpError),

    /// The remote answered but the payload was not what we expected.
    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    /// All attempts of a retried operation failed.
    #[error("{operation} failed after {attempts} attempts: {last_error}")]
    RetryExhausted {
        operation: String,
        attempts: u32,
        last_error: HttpError,
    },

    /// A version-control command failed to launch or exited non-zero.
    #[error("Error updating with {command}: {message}")]
    Vcs {
        command: String,
        message: String,
        /// The VCS program could not be launched at all
        not_invocable: bool,
    },

    /// Downloading, extracting or copying the release archive failed.
    #[error("Error updating from archive ({stage}): {message}")]
    Archive { stage: ArchiveStage, message: String },

    /// The dependency install command failed.
    #[error("Error installing dependencies with '{command}': {message}")]
    Install { command: String, message: String },

    /// The replacement process could not be spawned.
    #[error("Failed to restart with '{command}': {source}")]
    Restart {
        command: String,
        #[source]
        source: ProcessError,
    },

    /// Reading the operator's answer failed.
    #[error("Confirmation prompt failed: {0}")]
    Prompt(#[from] PromptError),

    /// Anything that escaped the session's own handling.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Where in the archive update a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveStage {
    Download,
    Extract,
    ResolveRoot,
    Overlay,
}

impl fmt::Display for ArchiveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArchiveStage::Download => "download",
            ArchiveStage::Extract => "extract",
            ArchiveStage::ResolveRoot => "resolve root",
            ArchiveStage::Overlay => "overlay",
        };
        f.write_str(s)
    }
}

impl From<HttpError> for UpdateError {
    fn from(e: HttpError) -> Self {
        UpdateError::Network(e)
    }
}

impl UpdateError {
    /// Get the category of this error.
    pub fn category(&self) -> UpdateErrorCategory {
        match self {
            UpdateError::LocalRead { .. } => UpdateErrorCategory::LocalManifest,

            UpdateError::Network(_)
            | UpdateError::InvalidResponse { .. }
            | UpdateError::RetryExhausted { .. } => UpdateErrorCategory::Network,

            UpdateError::Vcs { .. } => UpdateErrorCategory::Vcs,
            UpdateError::Archive { .. } => UpdateErrorCategory::Archive,
            UpdateError::Install { .. } => UpdateErrorCategory::Install,
            UpdateError::Restart { .. } => UpdateErrorCategory::Restart,

            UpdateError::Prompt(_) | UpdateError::Unexpected(_) => {
                UpdateErrorCategory::Unexpected
            }
        }
    }

    /// Get a short error code suitable for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            UpdateError::LocalRead { .. } => "E_LOCAL_READ",
            UpdateError::Network(e) => e.code(),
            UpdateError::InvalidResponse { .. } => "E_INVALID_RESPONSE",
            UpdateError::RetryExhausted { .. } => "E_RETRY_EXHAUSTED",
            UpdateError::Vcs { .. } => "E_VCS",
            UpdateError::Archive { .. } => "E_ARCHIVE",
            UpdateError::Install { .. } => "E_INSTALL",
            UpdateError::Restart { .. } => "E_RESTART",
            UpdateError::Prompt(_) => "E_PROMPT",
            UpdateError::Unexpected(_) => "E_UNEXPECTED",
        }
    }

    /// Get a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            UpdateError::LocalRead { path, .. } => format!(
                "Could not read the installed version from '{}'. Is the application directory intact?",
                path.display()
            ),
            UpdateError::Network(_)
            | UpdateError::InvalidResponse { .. }
            | UpdateError::RetryExhausted { .. } => {
                "Please check your network connection and try again later.".to_string()
            }
            UpdateError::Vcs { .. } => {
                "Updating through version control failed; some files may not be up to date."
                    .to_string()
            }
            UpdateError::Archive { .. } => {
                "Updating from the release archive failed; some files may not be up to date."
                    .to_string()
            }
            UpdateError::Install { .. } => {
                "Installing dependencies failed; the previously installed set will be used."
                    .to_string()
            }
            UpdateError::Restart { .. } => {
                "The application could not restart itself. Please start it again manually."
                    .to_string()
            }
            UpdateError::Prompt(_) | UpdateError::Unexpected(_) => {
                "An unexpected error occurred during the update.".to_string()
            }
        }
    }

    /// Shorthand for an archive error at `stage`.
    pub fn archive(stage: ArchiveStage, message: impl fmt::Display) -> Self {
        UpdateError::Archive {
            stage,
            message: message.to_string(),
        }
    }
}
