//! Dependency reinstall after the working tree changed.

use std::sync::Arc;

use super::errors::UpdateError;
use super::logger::{UpdateEvent, UpdateLogger};
use super::orchestrator::StepOutcome;
use crate::config::UpdaterConfig;
use crate::traits::{CommandSpec, ProcessRunner};

pub struct DependencyInstaller {
    process: Arc<dyn ProcessRunner>,
    config: Arc<UpdaterConfig>,
    logger: UpdateLogger,
}

impl DependencyInstaller {
    pub fn new(
        process: Arc<dyn ProcessRunner>,
        config: Arc<UpdaterConfig>,
        logger: UpdateLogger,
    ) -> Self {
        Self {
            process,
            config,
            logger,
        }
    }

    /// Run the install command in the working directory and wait for it.
    ///
    /// Failure is logged and returned as [`StepOutcome::Failed`]; whatever
    /// dependencies are already on disk stay usable.
    pub async fn install(&self) -> StepOutcome {
        let line = &self.config.install_command;
        self.logger.log(&UpdateEvent::InstallStarted {
            command: line.clone(),
        });

        let command = CommandSpec::shell(line).current_dir(&self.config.work_dir);
        let failure = match self.process.run(&command).await {
            Ok(output) if output.is_success() => {
                self.logger.log(&UpdateEvent::InstallCompleted);
                return StepOutcome::Completed;
            }
            Ok(output) => match output.code {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by signal".to_string(),
            },
            Err(err) => err.to_string(),
        };

        let err = UpdateError::Install {
            command: line.clone(),
            message: failure,
        };
        self.logger.log_error(&err, "Error installing dependencies");
        StepOutcome::Failed(err)
    }
}
