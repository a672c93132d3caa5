//! End-to-end update session.
//!
//! ```text
//! Idle -> CheckingVersion -> UpToDate
//!                         -> UpdateAvailable -> AwaitingConfirmation -> Declined
//!                                                                   -> Updating
//!      -> InstallingDependencies -> Restarting
//! ```
//!
//! `Failed` is entered when the version check cannot complete, and when
//! anything else escapes the session (a broken prompt, a restart that could
//! not be spawned). The update and install steps themselves never fail the
//! session; their outcomes are recorded in the [`SessionReport`].

use std::fmt;
use std::sync::Arc;

use super::archive::ArchiveUpdater;
use super::checker::{Version, VersionCheck, VersionChecker};
use super::deps::DependencyInstaller;
use super::errors::{UpdateError, UpdateErrorCategory};
use super::logger::{UpdateEvent, UpdateLogger};
use super::restart::ProcessRestarter;
use super::strategy::{Strategy, StrategySelector};
use super::vcs::VcsUpdater;
use crate::config::UpdaterConfig;
use crate::traits::{Confirm, HttpClient, ProcessRunner, UpdateLog};

/// Question put to the operator when an update is available.
pub const CONFIRM_PROMPT: &str = "Would you like to update?";

/// States of one update session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    CheckingVersion,
    UpToDate,
    UpdateAvailable,
    AwaitingConfirmation,
    Declined,
    Updating,
    InstallingDependencies,
    Restarting,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::UpToDate
                | SessionState::Declined
                | SessionState::Restarting
                | SessionState::Failed
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of a best-effort step.
#[derive(Debug)]
pub enum StepOutcome {
    Completed,
    /// The step failed and was logged; the session carried on
    Failed(UpdateError),
}

impl StepOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed)
    }

    pub fn error(&self) -> Option<&UpdateError> {
        match self {
            StepOutcome::Completed => None,
            StepOutcome::Failed(err) => Some(err),
        }
    }
}

/// Best-effort steps recorded in a [`SessionReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStep {
    Vcs,
    Archive,
    Install,
}

#[derive(Debug)]
pub struct StepRecord {
    pub step: UpdateStep,
    pub outcome: StepOutcome,
}

/// What happened during a session.
#[derive(Debug)]
pub struct SessionReport {
    pub final_state: SessionState,
    /// Every state entered, starting with `Idle`
    pub states: Vec<SessionState>,
    pub local: Option<Version>,
    pub remote: Option<Version>,
    /// Strategy that last ran; `Archive` after a fallback
    pub strategy: Option<Strategy>,
    pub steps: Vec<StepRecord>,
    /// The error that moved the session to `Failed`
    pub error: Option<UpdateError>,
}

impl SessionReport {
    pub fn restarted(&self) -> bool {
        self.final_state == SessionState::Restarting
    }

    /// Outcome of `step`, if it ran.
    pub fn outcome(&self, step: UpdateStep) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| &record.outcome)
    }
}

struct Session {
    logger: UpdateLogger,
    report: SessionReport,
}

impl Session {
    fn new(logger: UpdateLogger) -> Self {
        Self {
            logger,
            report: SessionReport {
                final_state: SessionState::Idle,
                states: vec![SessionState::Idle],
                local: None,
                remote: None,
                strategy: None,
                steps: Vec::new(),
                error: None,
            },
        }
    }

    fn enter(&mut self, state: SessionState) {
        self.logger.debug(&format!(
            "Update session: {} -> {}",
            self.report.final_state, state
        ));
        self.report.final_state = state;
        self.report.states.push(state);
    }

    fn record(&mut self, step: UpdateStep, outcome: StepOutcome) {
        self.report.steps.push(StepRecord { step, outcome });
    }

    fn versions(&mut self, check: &VersionCheck) {
        self.report.local = Some(check.local.clone());
        self.report.remote = Some(check.remote.clone());
    }
}

/// External collaborators of the updater.
#[derive(Clone)]
pub struct UpdaterDeps {
    pub http: Arc<dyn HttpClient>,
    pub process: Arc<dyn ProcessRunner>,
    pub confirm: Arc<dyn Confirm>,
    pub log: Arc<dyn UpdateLog>,
}

/// Sequences check, confirmation, update, install and restart.
pub struct UpdateOrchestrator {
    logger: UpdateLogger,
    confirm: Arc<dyn Confirm>,
    checker: VersionChecker,
    selector: StrategySelector,
    vcs: VcsUpdater,
    archive: ArchiveUpdater,
    installer: DependencyInstaller,
    restarter: ProcessRestarter,
}

impl UpdateOrchestrator {
    pub fn new(config: UpdaterConfig, deps: UpdaterDeps) -> Self {
        let config = Arc::new(config);
        let logger = UpdateLogger::new(deps.log);

        Self {
            checker: VersionChecker::new(deps.http.clone(), config.clone(), logger.clone()),
            selector: StrategySelector::new(deps.process.clone(), config.clone()),
            vcs: VcsUpdater::new(deps.process.clone(), config.clone(), logger.clone()),
            archive: ArchiveUpdater::new(deps.http, config.clone(), logger.clone()),
            installer: DependencyInstaller::new(deps.process.clone(), config.clone(), logger.clone()),
            restarter: ProcessRestarter::new(deps.process, config, logger.clone()),
            confirm: deps.confirm,
            logger,
        }
    }

    /// Run a full session.
    ///
    /// Returns only when no restart happened (or when the process runner does
    /// not actually exit, as in tests).
    pub async fn run(&self) -> SessionReport {
        let mut session = Session::new(self.logger.clone());
        session.enter(SessionState::CheckingVersion);

        if let Err(err) = self.run_session(&mut session).await {
            self.fail(&mut session, err);
        }
        session.report
    }

    /// Check for an update without prompting or touching any files.
    ///
    /// Ends in `UpToDate`, `UpdateAvailable` or `Failed`.
    pub async fn check_only(&self) -> SessionReport {
        let mut session = Session::new(self.logger.clone());
        session.enter(SessionState::CheckingVersion);

        match self.checker.check().await {
            Ok(check) => {
                session.versions(&check);
                session.enter(if check.up_to_date {
                    SessionState::UpToDate
                } else {
                    SessionState::UpdateAvailable
                });
            }
            Err(err) => self.fail(&mut session, err),
        }
        session.report
    }

    async fn run_session(&self, session: &mut Session) -> Result<(), UpdateError> {
        let check = self.checker.check().await?;
        session.versions(&check);
        if check.up_to_date {
            session.enter(SessionState::UpToDate);
            return Ok(());
        }
        session.enter(SessionState::UpdateAvailable);

        session.enter(SessionState::AwaitingConfirmation);
        if !self.confirm.confirm(CONFIRM_PROMPT, true).await? {
            self.logger.log(&UpdateEvent::UpdateDeclined {
                latest_version: check.remote.to_string(),
            });
            session.enter(SessionState::Declined);
            return Ok(());
        }

        session.enter(SessionState::Updating);
        self.logger.log(&UpdateEvent::UpdateStarted);
        self.apply_update(session).await;

        session.enter(SessionState::InstallingDependencies);
        let installed = self.installer.install().await;
        session.record(UpdateStep::Install, installed);
        self.logger.log(&UpdateEvent::UpdateCompleted);

        session.enter(SessionState::Restarting);
        self.restarter.restart()
    }

    async fn apply_update(&self, session: &mut Session) {
        let strategy = self.selector.select().await;
        session.report.strategy = Some(strategy);
        self.logger.log(&UpdateEvent::StrategySelected { strategy });

        if strategy == Strategy::Archive {
            let outcome = self.archive.update().await;
            session.record(UpdateStep::Archive, outcome);
            return;
        }

        let outcome = self.vcs.update().await;
        let fallback_reason = match outcome.error() {
            Some(err @ UpdateError::Vcs {
                not_invocable: true,
                ..
            }) => Some(err.to_string()),
            _ => None,
        };
        session.record(UpdateStep::Vcs, outcome);

        if let Some(reason) = fallback_reason {
            self.logger.log(&UpdateEvent::VcsFallback { reason });
            session.report.strategy = Some(Strategy::Archive);
            let outcome = self.archive.update().await;
            session.record(UpdateStep::Archive, outcome);
        }
    }

    fn fail(&self, session: &mut Session, err: UpdateError) {
        match err.category() {
            UpdateErrorCategory::Network => {
                self.logger
                    .log_error(&err, "Failed to check for updates after multiple retries");
                self.logger.warn(&err.user_message());
            }
            UpdateErrorCategory::LocalManifest => {
                self.logger.log_error(&err, "Failed to read the installed version");
            }
            UpdateErrorCategory::Restart => {
                self.logger.log_error(&err, "Failed to restart");
                self.logger.warn(&err.user_message());
            }
            _ => {
                self.logger.error(&format!("Unexpected error during update: {:?}", err));
            }
        }
        session.report.error = Some(err);
        session.enter(SessionState::Failed);
    }
}
