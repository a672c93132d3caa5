//! Mock process runner for testing.
//!
//! Records every command instead of executing it and replays outcomes
//! configured per command line. Unconfigured commands succeed.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{CommandOutput, CommandSpec, ProcessError, ProcessRunner};

/// How a recorded command was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Run,
    Detached,
}

/// A recorded invocation.
#[derive(Debug, Clone)]
pub struct ProcessCall {
    pub kind: CallKind,
    pub command: CommandSpec,
}

/// Configured result for a command line.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// The command ran and produced this output
    Output(CommandOutput),
    /// The command could not be launched or waited on
    Error(ProcessError),
}

impl MockOutcome {
    /// The program is not installed.
    pub fn not_found(program: &str) -> Self {
        MockOutcome::Error(ProcessError::Spawn {
            program: program.to_string(),
            message: "No such file or directory (os error 2)".to_string(),
        })
    }

    /// The command ran and exited with `code`.
    pub fn exit_code(code: i32, stderr: &str) -> Self {
        MockOutcome::Output(CommandOutput::failure(code, stderr))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockProcessRunner {
    outcomes: Arc<Mutex<HashMap<String, MockOutcome>>>,
    calls: Arc<Mutex<Vec<ProcessCall>>>,
    exits: Arc<Mutex<Vec<i32>>>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the result for an exact command line such as `"git --version"`.
    pub fn set_outcome(&self, command_line: &str, outcome: MockOutcome) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(command_line.to_string(), outcome);
    }

    /// All recorded invocations, in order.
    pub fn calls(&self) -> Vec<ProcessCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Command lines of every recorded invocation, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.command.command_line())
            .collect()
    }

    /// Exit codes requested through [`ProcessRunner::exit`].
    pub fn exit_codes(&self) -> Vec<i32> {
        self.exits.lock().unwrap().clone()
    }

    fn record(&self, kind: CallKind, command: &CommandSpec) -> Option<MockOutcome> {
        self.calls.lock().unwrap().push(ProcessCall {
            kind,
            command: command.clone(),
        });
        self.outcomes
            .lock()
            .unwrap()
            .get(&command.command_line())
            .cloned()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        match self.record(CallKind::Run, command) {
            Some(MockOutcome::Output(output)) => Ok(output),
            Some(MockOutcome::Error(err)) => Err(err),
            None => Ok(CommandOutput::success()),
        }
    }

    fn spawn_detached(&self, command: &CommandSpec) -> Result<(), ProcessError> {
        match self.record(CallKind::Detached, command) {
            Some(MockOutcome::Error(err)) => Err(err),
            _ => Ok(()),
        }
    }

    fn exit(&self, code: i32) {
        self.exits.lock().unwrap().push(code);
    }
}
