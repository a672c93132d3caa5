//! Subprocess trait abstraction.
//!
//! Covers the three ways the updater touches other processes: running a
//! command to completion (VCS probe, stash/pull/reset, dependency install),
//! spawning a detached replacement process, and terminating the current one.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A command to run: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Run `line` through the platform shell (`sh -c` or `cmd /C`).
    pub fn shell(line: &str) -> Self {
        #[cfg(windows)]
        {
            Self::new("cmd").args(["/C", line])
        }
        #[cfg(not(windows))]
        {
            Self::new("sh").args(["-c", line])
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// The command line as a single space-separated string.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Captured result of a command that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A zero exit status with no output.
    pub fn success() -> Self {
        Self {
            code: Some(0),
            ..Default::default()
        }
    }

    /// A non-zero exit status with the given stderr.
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Errors raised while launching or waiting on a subprocess.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessError {
    /// The program could not be started at all (missing binary, no permission).
    #[error("failed to launch '{program}': {message}")]
    Spawn { program: String, message: String },

    /// The process started but waiting on it failed.
    #[error("I/O error while running '{program}': {message}")]
    Io { program: String, message: String },
}

impl ProcessError {
    /// True when the program itself could not be launched.
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, ProcessError::Spawn { .. })
    }
}

/// Trait for subprocess operations.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command and wait for it to finish.
    ///
    /// A non-zero exit status is not an error at this level; it is reported
    /// through [`CommandOutput::code`].
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ProcessError>;

    /// Start a command that outlives the current process.
    ///
    /// The child is not awaited and its handle is dropped immediately.
    fn spawn_detached(&self, command: &CommandSpec) -> Result<(), ProcessError>;

    /// Terminate the current process with `code`.
    ///
    /// The production implementation does not return.
    fn exit(&self, code: i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let cmd = CommandSpec::new("git").args(["pull", "--force"]);
        assert_eq!(cmd.command_line(), "git pull --force");
        assert_eq!(cmd.to_string(), "git pull --force");
    }

    #[test]
    fn test_current_dir() {
        let cmd = CommandSpec::new("npm").arg("install").current_dir("/srv/farm");
        assert_eq!(cmd.cwd, Some(PathBuf::from("/srv/farm")));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_shell_wraps_line() {
        let cmd = CommandSpec::shell("npm install");
        assert_eq!(cmd.program, "sh");
        assert_eq!(cmd.args, vec!["-c".to_string(), "npm install".to_string()]);
    }

    #[test]
    fn test_command_output_status() {
        assert!(CommandOutput::success().is_success());
        assert!(!CommandOutput::failure(128, "fatal").is_success());
        assert!(!CommandOutput::default().is_success());
    }

    #[test]
    fn test_spawn_failure_detection() {
        let err = ProcessError::Spawn {
            program: "git".to_string(),
            message: "not found".to_string(),
        };
        assert!(err.is_spawn_failure());
        assert!(err.to_string().contains("failed to launch 'git'"));

        let err = ProcessError::Io {
            program: "git".to_string(),
            message: "broken pipe".to_string(),
        };
        assert!(!err.is_spawn_failure());
    }
}
