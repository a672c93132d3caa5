//! Trait abstractions for dependency injection and testability.
//!
//! Every external collaborator of the updater sits behind one of these traits:
//!
//! - [`HttpClient`] - manifest and archive downloads
//! - [`ProcessRunner`] - VCS commands, dependency install, restart
//! - [`Confirm`] - the yes/no operator prompt
//! - [`UpdateLog`] - the logging capability

pub mod http;
pub mod log;
pub mod process;
pub mod prompt;

pub use http::{Headers, HttpClient, HttpError, Response};
pub use log::UpdateLog;
pub use process::{CommandOutput, CommandSpec, ProcessError, ProcessRunner};
pub use prompt::{Confirm, PromptError};
