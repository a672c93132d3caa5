//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`SystemProcessRunner`] - OS subprocesses via tokio/std
//! - [`StdinPrompt`] / [`AutoConfirm`] - operator confirmation
//! - [`TracingLog`] - logging through `tracing`
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for all adapters.

pub mod mock;
pub mod prompt;
pub mod reqwest_http;
pub mod system_process;
pub mod tracing_log;

pub use prompt::{AutoConfirm, StdinPrompt};
pub use reqwest_http::ReqwestHttpClient;
pub use system_process::SystemProcessRunner;
pub use tracing_log::TracingLog;
