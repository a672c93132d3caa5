//! Self-update for an installed farm tool checkout.
//!
//! A session runs these steps in order:
//! - compare the local `package.json` version with upstream ([`VersionChecker`])
//! - ask the operator before changing anything
//! - update through git when the working tree is tracked ([`VcsUpdater`]),
//!   from the release zip otherwise or when git cannot be launched
//!   ([`ArchiveUpdater`])
//! - reinstall dependencies ([`DependencyInstaller`])
//! - start a detached replacement and exit ([`ProcessRestarter`])
//!
//! [`UpdateOrchestrator`] drives the sequence. Network reads go through
//! [`RetryExecutor`]; the update and install steps log their failures and let
//! the session carry on.
//!
//! # Example
//!
//! ```ignore
//! use farmup::config::UpdaterConfig;
//! use farmup::update::UpdateOrchestrator;
//!
//! let orchestrator = UpdateOrchestrator::new(UpdaterConfig::from_env(), deps);
//! let report = orchestrator.run().await;
//! println!("session ended in {}", report.final_state);
//! ```
//!
//! # Error Handling
//!
//! Every failure is an [`UpdateError`] with a stable code, a category and a
//! user-facing message:
//!
//! ```ignore
//! if let Some(err) = &report.error {
//!     eprintln!("[{}] {}", err.error_code(), err.user_message());
//! }
//! ```

pub mod archive;
pub mod checker;
pub mod deps;
pub mod errors;
pub mod logger;
pub mod orchestrator;
pub mod overlay;
pub mod restart;
pub mod retry;
pub mod strategy;
pub mod vcs;

pub use archive::{extract_release, ArchiveUpdater};
pub use checker::{read_local_version, Version, VersionCheck, VersionChecker, VersionOrdering};
pub use deps::DependencyInstaller;
pub use errors::{ArchiveStage, UpdateError, UpdateErrorCategory};
pub use logger::{UpdateEvent, UpdateLogLevel, UpdateLogger};
pub use orchestrator::{
    SessionReport, SessionState, StepOutcome, StepRecord, UpdateOrchestrator, UpdateStep,
    UpdaterDeps, CONFIRM_PROMPT,
};
pub use overlay::copy_tree;
pub use restart::ProcessRestarter;
pub use retry::{RetryExecutor, RetryExhausted, RetryPolicy};
pub use strategy::{Strategy, StrategySelector};
pub use vcs::VcsUpdater;
