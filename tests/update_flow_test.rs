//! End-to-end update sessions against mocked collaborators.

mod common;

use common::*;
use farmup::adapters::mock::{CallKind, CapturedLevel, MockOutcome, MockResponse};
use farmup::traits::{CommandSpec, HttpError};
use farmup::update::{SessionState, Strategy, UpdateError, UpdateStep, CONFIRM_PROMPT};
use std::time::Duration;

#[tokio::test]
async fn test_same_version_is_up_to_date() {
    let fx = UpdateFixture::new("1.0.0");
    fx.remote_version("1.0.0");
    let (orchestrator, confirm) = fx.orchestrator(true);

    let report = orchestrator.run().await;

    assert_eq!(report.final_state, SessionState::UpToDate);
    assert_eq!(confirm.times_asked(), 0);
    assert!(fx.process.calls().is_empty());
    assert_eq!(fx.http.request_count(ARCHIVE_URL), 0);
}

#[tokio::test]
async fn test_newer_local_version_is_up_to_date() {
    let fx = UpdateFixture::new("2.0.0");
    fx.remote_version("1.9.9");
    let (orchestrator, _) = fx.orchestrator(true);

    assert_eq!(orchestrator.run().await.final_state, SessionState::UpToDate);
}

#[tokio::test]
async fn test_manifest_request_carries_user_agent_and_timeout() {
    let fx = UpdateFixture::new("1.0.0");
    fx.remote_version("1.0.0");
    let (orchestrator, _) = fx.orchestrator(true);

    orchestrator.run().await;

    let requests = fx.http.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, MANIFEST_URL);
    assert_eq!(requests[0].timeout, Duration::from_secs(10));
    assert!(requests[0].headers["User-Agent"].starts_with("Mozilla/5.0"));
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_remote_fails_and_keeps_running() {
    let fx = UpdateFixture::new("1.0.0");
    fx.http.set_response(
        MANIFEST_URL,
        MockResponse::Error(HttpError::ConnectionFailed("dns error".to_string())),
    );
    let (orchestrator, confirm) = fx.orchestrator(true);

    let report = orchestrator.run().await;

    assert_eq!(report.final_state, SessionState::Failed);
    assert_eq!(fx.http.request_count(MANIFEST_URL), 4);
    assert_eq!(confirm.times_asked(), 0);
    assert!(fx.process.exit_codes().is_empty());
    match report.error {
        Some(UpdateError::RetryExhausted {
            attempts,
            last_error,
            ..
        }) => {
            assert_eq!(attempts, 4);
            assert_eq!(last_error, HttpError::ConnectionFailed("dns error".to_string()));
        }
        other => panic!("expected RetryExhausted, got {:?}", other),
    }
    assert_eq!(fx.log.messages(CapturedLevel::Warn).len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_then_update_available() {
    let fx = UpdateFixture::new("1.0.0");
    fx.http.push_response(MANIFEST_URL, MockResponse::status(502));
    fx.http.push_response(
        MANIFEST_URL,
        MockResponse::Error(HttpError::Timeout("10s".to_string())),
    );
    fx.remote_version("1.1.0");
    let (orchestrator, _) = fx.orchestrator(false);

    let report = orchestrator.run().await;

    assert_eq!(fx.http.request_count(MANIFEST_URL), 3);
    assert_eq!(report.final_state, SessionState::Declined);
}

#[tokio::test]
async fn test_declined_update_changes_nothing() {
    let fx = UpdateFixture::new("1.0.0").tracked();
    fx.remote_version("1.1.0");
    let (orchestrator, confirm) = fx.orchestrator(false);

    let report = orchestrator.run().await;

    assert_eq!(report.final_state, SessionState::Declined);
    assert_eq!(confirm.questions(), vec![CONFIRM_PROMPT.to_string()]);
    assert!(fx.process.calls().is_empty());
    assert!(fx.log.contains("New version available: v1.1.0 (current: v1.0.0)"));
}

#[tokio::test]
async fn test_git_checkout_update_sequence() {
    let fx = UpdateFixture::new("1.0.0").tracked();
    fx.remote_version("1.1.0");
    let (orchestrator, _) = fx.orchestrator(true);

    let report = orchestrator.run().await;

    assert_eq!(
        report.states,
        vec![
            SessionState::Idle,
            SessionState::CheckingVersion,
            SessionState::UpdateAvailable,
            SessionState::AwaitingConfirmation,
            SessionState::Updating,
            SessionState::InstallingDependencies,
            SessionState::Restarting,
        ]
    );
    assert_eq!(report.strategy, Some(Strategy::Vcs));

    let calls = fx.process.calls();
    let lines: Vec<String> = calls.iter().map(|c| c.command.command_line()).collect();
    assert_eq!(
        lines,
        vec![
            "git --version".to_string(),
            "git stash".to_string(),
            "git pull --force".to_string(),
            "git reset --hard".to_string(),
            CommandSpec::shell("npm install").command_line(),
            fx.config().restart_command().command_line(),
        ]
    );
    assert_eq!(calls.last().unwrap().kind, CallKind::Detached);
    assert_eq!(fx.process.exit_codes(), vec![1]);
    assert!(fx.log.contains("Git detected, updating with Git!"));
}

#[tokio::test]
async fn test_failed_git_probe_falls_back_to_archive() {
    let fx = UpdateFixture::new("1.0.0").tracked();
    fx.remote_version("1.1.0");
    fx.process
        .set_outcome("git --version", MockOutcome::not_found("git"));
    fx.release_archive(&[("farm-main/", None), ("farm-main/index.js", Some("v2"))]);
    let (orchestrator, _) = fx.orchestrator(true);

    let report = orchestrator.run().await;

    assert_eq!(report.strategy, Some(Strategy::Archive));
    assert!(report.outcome(UpdateStep::Vcs).is_none());
    assert!(report.outcome(UpdateStep::Archive).unwrap().is_completed());
    assert_eq!(fx.read("index.js"), "v2");
    assert_eq!(report.final_state, SessionState::Restarting);
}

#[tokio::test]
async fn test_archive_overlay_keeps_unrelated_files() {
    let fx = UpdateFixture::new("1.0.0");
    std::fs::write(fx.work.path().join("a.txt"), "old").unwrap();
    std::fs::write(fx.work.path().join("config.json"), "{\"prefix\":\"owo\"}").unwrap();
    fx.remote_version("1.1.0");
    fx.release_archive(&[
        ("release-v2/", None),
        ("release-v2/a.txt", Some("new")),
        ("release-v2/package.json", Some("{\"version\":\"1.1.0\"}")),
    ]);
    let (orchestrator, _) = fx.orchestrator(true);

    let report = orchestrator.run().await;

    assert_eq!(report.strategy, Some(Strategy::Archive));
    assert_eq!(fx.read("a.txt"), "new");
    assert_eq!(fx.read("config.json"), "{\"prefix\":\"owo\"}");
    assert_eq!(fx.read("package.json"), "{\"version\":\"1.1.0\"}");
    assert_eq!(fx.http.get_requests().last().unwrap().timeout, Duration::from_secs(30));
}

#[tokio::test]
async fn test_install_failure_still_restarts() {
    let fx = UpdateFixture::new("1.0.0").tracked();
    fx.remote_version("1.1.0");
    fx.process.set_outcome(
        &CommandSpec::shell("npm install").command_line(),
        MockOutcome::exit_code(1, "npm ERR!"),
    );
    let (orchestrator, _) = fx.orchestrator(true);

    let report = orchestrator.run().await;

    assert!(!report.outcome(UpdateStep::Install).unwrap().is_completed());
    assert_eq!(report.final_state, SessionState::Restarting);
    assert_eq!(fx.process.exit_codes(), vec![1]);
}

#[tokio::test]
async fn test_check_only_reports_without_side_effects() {
    let fx = UpdateFixture::new("1.0.0").tracked();
    fx.remote_version("1.1.0");
    let (orchestrator, confirm) = fx.orchestrator(true);

    let report = orchestrator.check_only().await;

    assert_eq!(report.final_state, SessionState::UpdateAvailable);
    assert_eq!(confirm.times_asked(), 0);
    assert!(fx.process.calls().is_empty());
}
