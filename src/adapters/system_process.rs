//! Production [`ProcessRunner`] backed by the operating system.

use async_trait::async_trait;
use std::process::Stdio;

use crate::traits::{CommandOutput, CommandSpec, ProcessError, ProcessRunner};

#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;

/// Runs commands with `tokio::process` and spawns detached children with
/// `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn spawn_error(command: &CommandSpec, err: std::io::Error) -> ProcessError {
        ProcessError::Spawn {
            program: command.program.clone(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| Self::spawn_error(command, e))?;
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ProcessError::Io {
                program: command.program.clone(),
                message: e.to_string(),
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn spawn_detached(&self, command: &CommandSpec) -> Result<(), ProcessError> {
        let mut cmd = std::process::Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }

        // Own session, no controlling terminal.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // SAFETY: setsid is async-signal-safe and touches no parent state.
            unsafe {
                cmd.pre_exec(|| {
                    if libc::setsid() == -1 {
                        return Err(std::io::Error::last_os_error());
                    }
                    Ok(())
                });
            }
        }
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.creation_flags(CREATE_NEW_PROCESS_GROUP | DETACHED_PROCESS);
        }

        let child = cmd.spawn().map_err(|e| Self::spawn_error(command, e))?;
        // Never waited on.
        drop(child);
        Ok(())
    }

    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}
