//! Working-tree update through the VCS command-line tool.

use std::sync::Arc;

use super::errors::UpdateError;
use super::logger::{UpdateEvent, UpdateLogger};
use super::orchestrator::StepOutcome;
use crate::config::UpdaterConfig;
use crate::traits::{CommandSpec, ProcessRunner};

/// One VCS command and the line logged before it runs.
struct VcsStep {
    description: &'static str,
    command: CommandSpec,
}

/// Stashes local changes, force-pulls and hard-resets the working tree.
pub struct VcsUpdater {
    process: Arc<dyn ProcessRunner>,
    config: Arc<UpdaterConfig>,
    logger: UpdateLogger,
}

impl VcsUpdater {
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

    /// Run the update. Never returns an error; the first failing command
    /// stops the sequence and is reported through [`StepOutcome::Failed`].
    pub async fn update(&self) -> StepOutcome {
        for step in self.steps() {
            self.logger.log(&UpdateEvent::VcsStep {
                description: step.description.to_string(),
            });
            if let Err(err) = self.run_step(&step.command).await {
                self.logger.log_error(&err, "Error updating with Git");
                return StepOutcome::Failed(err);
            }
        }
        StepOutcome::Completed
    }

    fn steps(&self) -> Vec<VcsStep> {
        let vcs = |args: &[&str]| {
            CommandSpec::new(&self.config.vcs_program)
                .args(args.iter().copied())
                .current_dir(&self.config.work_dir)
        };

        let mut pull = vcs(&["pull", "--force"]);
        if let Some(remote) = &self.config.vcs_remote {
            pull = pull.arg(remote);
            if let Some(branch) = &self.config.vcs_branch {
                pull = pull.arg(branch);
            }
        }

        vec![
            VcsStep {
                description: "Stashing local changes...",
                command: vcs(&["stash"]),
            },
            VcsStep {
                description: "Pulling latest changes from remote...",
                command: pull,
            },
            VcsStep {
                description: "Resetting to latest commit...",
                command: vcs(&["reset", "--hard"]),
            },
        ]
    }

    async fn run_step(&self, command: &CommandSpec) -> Result<(), UpdateError> {
        match self.process.run(command).await {
            Ok(output) if output.is_success() => Ok(()),
            Ok(output) => Err(UpdateError::Vcs {
                command: command.command_line(),
                message: exit_message(output.code, &output.stderr),
                not_invocable: false,
            }),
            Err(err) => Err(UpdateError::Vcs {
                command: command.command_line(),
                message: err.to_string(),
                not_invocable: err.is_spawn_failure(),
            }),
        }
    }
}

fn exit_message(code: Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(code) => format!("exited with status {}", code),
        None => "terminated by signal".to_string(),
    };
    let stderr = stderr.trim();
    if stderr.is_empty() {
        status
    } else {
        format!("{}: {}", status, stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{CapturedLevel, CapturingLog, MockOutcome, MockProcessRunner};

    fn updater(config: UpdaterConfig, process: &MockProcessRunner) -> (VcsUpdater, CapturingLog) {
        let capture = CapturingLog::new();
        let updater = VcsUpdater::new(
            Arc::new(process.clone()),
            Arc::new(config),
            UpdateLogger::new(Arc::new(capture.clone())),
        );
        (updater, capture)
    }

    #[tokio::test]
    async fn test_runs_stash_pull_reset_in_order() {
        let process = MockProcessRunner::new();
        let (updater, capture) = updater(UpdaterConfig::default(), &process);

        assert!(updater.update().await.is_completed());
        assert_eq!(
            process.command_lines(),
            vec!["git stash", "git pull --force", "git reset --hard"]
        );
        assert_eq!(capture.messages(CapturedLevel::Debug).len(), 3);
    }

    #[tokio::test]
    async fn test_pull_uses_configured_remote_and_branch() {
        let process = MockProcessRunner::new();
        let config = UpdaterConfig::default().with_vcs_remote("upstream", Some("main".to_string()));
        let (updater, _) = updater(config, &process);

        updater.update().await;
        assert_eq!(process.command_lines()[1], "git pull --force upstream main");
    }

    #[tokio::test]
    async fn test_commands_run_in_work_dir() {
        let process = MockProcessRunner::new();
        let config = UpdaterConfig::default().with_work_dir("/srv/farm");
        let (updater, _) = updater(config, &process);

        updater.update().await;
        for call in process.calls() {
            assert_eq!(call.command.cwd.as_deref(), Some(std::path::Path::new("/srv/farm")));
        }
    }

    #[tokio::test]
    async fn test_failed_pull_stops_sequence() {
        let process = MockProcessRunner::new();
        process.set_outcome(
            "git pull --force",
            MockOutcome::exit_code(1, "fatal: unable to access remote\n"),
        );
        let (updater, capture) = updater(UpdaterConfig::default(), &process);

        let outcome = updater.update().await;

        assert_eq!(process.command_lines(), vec!["git stash", "git pull --force"]);
        match outcome.error() {
            Some(UpdateError::Vcs {
                command,
                message,
                not_invocable,
            }) => {
                assert_eq!(command, "git pull --force");
                assert_eq!(message, "exited with status 1: fatal: unable to access remote");
                assert!(!not_invocable);
            }
            other => panic!("expected Vcs error, got {:?}", other),
        }
        let errors = capture.messages(CapturedLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error updating with Git [E_VCS/vcs]"));
    }

    #[tokio::test]
    async fn test_missing_tool_is_not_invocable() {
        let process = MockProcessRunner::new();
        process.set_outcome("git stash", MockOutcome::not_found("git"));
        let (updater, _) = updater(UpdaterConfig::default(), &process);

        match updater.update().await.error() {
            Some(UpdateError::Vcs { not_invocable, .. }) => assert!(*not_invocable),
            other => panic!("expected Vcs error, got {:?}", other),
        }
        assert_eq!(process.calls().len(), 1);
    }

    #[test]
    fn test_exit_message() {
        assert_eq!(exit_message(Some(128), ""), "exited with status 128");
        assert_eq!(exit_message(None, "killed"), "terminated by signal: killed");
    }
}
