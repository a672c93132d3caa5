//! Update strategy selection.

use std::fmt;
use std::sync::Arc;

use crate::config::UpdaterConfig;
use crate::traits::{CommandSpec, ProcessRunner};

/// How the working tree gets updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// stash, pull and reset through the VCS tool
    Vcs,
    /// download the release zip and overlay it
    Archive,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Vcs => f.write_str("vcs"),
            Strategy::Archive => f.write_str("archive"),
        }
    }
}

/// Picks [`Strategy::Vcs`] for a tracked working tree with a usable VCS tool,
/// [`Strategy::Archive`] otherwise.
///
/// Falling back after a failed VCS update is left to the caller.
pub struct StrategySelector {
    process: Arc<dyn ProcessRunner>,
    config: Arc<UpdaterConfig>,
}

impl StrategySelector {
    pub fn new(process: Arc<dyn ProcessRunner>, config: Arc<UpdaterConfig>) -> Self {
        Self { process, config }
    }

    pub async fn select(&self) -> Strategy {
        if !self.config.vcs_metadata_path().exists() {
            return Strategy::Archive;
        }
        if self.vcs_invocable().await {
            Strategy::Vcs
        } else {
            Strategy::Archive
        }
    }

    /// Probe the VCS tool with a trivial version query.
    async fn vcs_invocable(&self) -> bool {
        let probe = CommandSpec::new(&self.config.vcs_program)
            .arg("--version")
            .current_dir(&self.config.work_dir);
        matches!(self.process.run(&probe).await, Ok(output) if output.is_success())
    }
}
