//! Mock implementations for testing.
//!
//! Test doubles for every trait in `crate::traits`, so the update flow can be
//! exercised without network access, real subprocesses or a terminal.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`MockProcessRunner`] - records commands, replays outcomes
//! - [`MockConfirm`] - fixed answer, counts questions
//! - [`CapturingLog`] - stores log lines

pub mod http;
pub mod log;
pub mod process;
pub mod prompt;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use log::{CapturedLevel, CapturingLog};
pub use process::{CallKind, MockOutcome, MockProcessRunner, ProcessCall};
pub use prompt::MockConfirm;
