//! Hand-off to a fresh application process.

use std::sync::Arc;

use super::errors::UpdateError;
use super::logger::{UpdateEvent, UpdateLogger};
use crate::config::UpdaterConfig;
use crate::traits::ProcessRunner;

pub struct ProcessRestarter {
    process: Arc<dyn ProcessRunner>,
    config: Arc<UpdaterConfig>,
    logger: UpdateLogger,
}

impl ProcessRestarter {
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

    /// Spawn the start command detached, then exit with the restart status.
    ///
    /// With the system runner this does not return once the spawn succeeded.
    /// If the spawn fails the current process is left running and the error
    /// is returned.
    pub fn restart(&self) -> Result<(), UpdateError> {
        let command = self.config.restart_command();

        self.process
            .spawn_detached(&command)
            .map_err(|source| UpdateError::Restart {
                command: command.command_line(),
                source,
            })?;

        self.logger.log(&UpdateEvent::RestartSpawned {
            command: self.config.start_command.clone(),
        });
        self.process.exit(self.config.restart_exit_code);
        Ok(())
    }
}
