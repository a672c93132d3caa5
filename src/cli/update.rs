//! Update and check commands for farmup.
//!
//! Wires the production adapters into an [`UpdateOrchestrator`] and runs it
//! on a fresh tokio runtime.

use color_eyre::Result;
use std::sync::Arc;

use crate::adapters::{AutoConfirm, ReqwestHttpClient, StdinPrompt, SystemProcessRunner, TracingLog};
use crate::config::UpdaterConfig;
use crate::traits::Confirm;
use crate::update::{SessionReport, UpdateOrchestrator, UpdaterDeps};

/// Collaborators backed by the network, the OS and the terminal.
pub fn system_deps(assume_yes: bool) -> UpdaterDeps {
    let confirm: Arc<dyn Confirm> = if assume_yes {
        Arc::new(AutoConfirm::new(true))
    } else {
        Arc::new(StdinPrompt::new())
    };

    UpdaterDeps {
        http: Arc::new(ReqwestHttpClient::new()),
        process: Arc::new(SystemProcessRunner::new()),
        confirm,
        log: Arc::new(TracingLog::new()),
    }
}

/// Run a full update session.
///
/// Does not return if the session restarted the application.
pub fn handle_update_command(config: UpdaterConfig, assume_yes: bool) -> Result<SessionReport> {
    let deps = system_deps(assume_yes);
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(UpdateOrchestrator::new(config, deps).run()))
}

/// Check for an update without prompting or changing files.
pub fn handle_check_command(config: UpdaterConfig) -> Result<SessionReport> {
    let deps = system_deps(false);
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(UpdateOrchestrator::new(config, deps).check_only()))
}
