//! Update event logging.
//!
//! Every notable step of an update session is described by an [`UpdateEvent`].
//! [`UpdateLogger`] maps each event to a level and message and writes it to
//! the injected [`UpdateLog`] sink.

use std::sync::Arc;
use std::time::Duration;

use super::errors::UpdateError;
use super::strategy::Strategy;
use crate::traits::UpdateLog;

/// Log level for update events. Errors go through [`UpdateLogger::log_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateLogLevel {
    Debug,
    Info,
    Warn,
}

/// Types of update events that can be logged.
#[derive(Debug, Clone)]
pub enum UpdateEvent {
    // ========== Check Events ==========
    CheckStarted,
    UpToDate { current_version: String },
    UpdateAvailable {
        current_version: String,
        latest_version: String,
    },
    UpdateDeclined { latest_version: String },

    // ========== Retry Events ==========
    /// An attempt failed and another one is scheduled
    RetryScheduled {
        operation: String,
        error: String,
        delay: Duration,
        attempts_left: u32,
    },

    // ========== Apply Events ==========
    UpdateStarted,
    StrategySelected { strategy: Strategy },
    /// The VCS tool could not be launched, archive is used instead
    VcsFallback { reason: String },
    VcsStep { description: String },
    DownloadCompleted { url: String, size: u64 },
    ArchiveExtracted { root: String },
    OverlayCompleted { files_copied: usize },

    // ========== Install / Restart Events ==========
    InstallStarted { command: String },
    InstallCompleted,
    UpdateCompleted,
    RestartSpawned { command: String },
}

impl UpdateEvent {
    /// Get the log level for this event.
    pub fn level(&self) -> UpdateLogLevel {
        match self {
            UpdateEvent::VcsStep { .. }
            | UpdateEvent::DownloadCompleted { .. }
            | UpdateEvent::ArchiveExtracted { .. } => UpdateLogLevel::Debug,

            UpdateEvent::RetryScheduled { .. } | UpdateEvent::VcsFallback { .. } => {
                UpdateLogLevel::Warn
            }

            UpdateEvent::CheckStarted
            | UpdateEvent::UpToDate { .. }
            | UpdateEvent::UpdateAvailable { .. }
            | UpdateEvent::UpdateDeclined { .. }
            | UpdateEvent::UpdateStarted
            | UpdateEvent::StrategySelected { .. }
            | UpdateEvent::OverlayCompleted { .. }
            | UpdateEvent::InstallStarted { .. }
            | UpdateEvent::InstallCompleted
            | UpdateEvent::UpdateCompleted
            | UpdateEvent::RestartSpawned { .. } => UpdateLogLevel::Info,
        }
    }

    /// Get a human-readable message for this event.
    pub fn message(&self) -> String {
        match self {
            UpdateEvent::CheckStarted => "Checking for update...".to_string(),
            UpdateEvent::UpToDate { current_version } => {
                format!("You are running the latest version: {}", current_version)
            }
            UpdateEvent::UpdateAvailable {
                current_version,
                latest_version,
            } => format!(
                "New version available: v{} (current: v{})",
                latest_version, current_version
            ),
            UpdateEvent::UpdateDeclined { latest_version } => format!(
                "Update to v{} declined, continuing on the current version",
                latest_version
            ),
            UpdateEvent::RetryScheduled {
                operation,
                error,
                delay,
                attempts_left,
            } => format!(
                "{} failed ({}), retrying in {} seconds... ({} attempts left)",
                operation,
                error,
                format_secs(*delay),
                attempts_left
            ),
            UpdateEvent::UpdateStarted => "Updating...".to_string(),
            UpdateEvent::StrategySelected { strategy } => match strategy {
                Strategy::Vcs => "Git detected, updating with Git!".to_string(),
                Strategy::Archive => "Updating from the release archive...".to_string(),
            },
            UpdateEvent::VcsFallback { reason } => {
                format!("Git not usable ({}), updating manually...", reason)
            }
            UpdateEvent::VcsStep { description } => description.clone(),
            UpdateEvent::DownloadCompleted { url, size } => {
                format!("Downloaded {} from {}", format_bytes(*size), url)
            }
            UpdateEvent::ArchiveExtracted { root } => {
                format!("Release extracted to {}", root)
            }
            UpdateEvent::OverlayCompleted { files_copied } => {
                format!("Copied {} files into the working directory", files_copied)
            }
            UpdateEvent::InstallStarted { command } => {
                format!("Installing dependencies ({})...", command)
            }
            UpdateEvent::InstallCompleted => "Dependencies installed successfully.".to_string(),
            UpdateEvent::UpdateCompleted => "Update completed!".to_string(),
            UpdateEvent::RestartSpawned { command } => {
                format!("Restarting with '{}'...", command)
            }
        }
    }
}

/// Seconds with at most one decimal, `1` rather than `1.0`.
fn format_secs(delay: Duration) -> String {
    let secs = delay.as_secs_f64();
    if secs.fract() == 0.0 {
        format!("{}", secs as u64)
    } else {
        format!("{:.1}", secs)
    }
}

/// Format bytes in a human-readable way.
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Logger for update operations.
///
/// Cheap to clone; all clones write to the same sink.
#[derive(Clone)]
pub struct UpdateLogger {
    sink: Arc<dyn UpdateLog>,
}

impl UpdateLogger {
    pub fn new(sink: Arc<dyn UpdateLog>) -> Self {
        Self { sink }
    }

    /// Log an update event.
    pub fn log(&self, event: &UpdateEvent) {
        let message = event.message();
        match event.level() {
            UpdateLogLevel::Debug => self.sink.debug(&message),
            UpdateLogLevel::Info => self.sink.info(&message),
            UpdateLogLevel::Warn => self.sink.warn(&message),
        }
    }

    /// Log an UpdateError with its code and category.
    pub fn log_error(&self, error: &UpdateError, context: &str) {
        self.sink.error(&format!(
            "{} [{}/{}]: {}",
            context,
            error.error_code(),
            error.category(),
            error
        ));
    }

    pub fn debug(&self, message: &str) {
        self.sink.debug(message);
    }

    pub fn info(&self, message: &str) {
        self.sink.info(message);
    }

    pub fn warn(&self, message: &str) {
        self.sink.warn(message);
    }

    pub fn error(&self, message: &str) {
        self.sink.error(message);
    }
}

impl std::fmt::Debug for UpdateLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateLogger").finish_non_exhaustive()
    }
}
