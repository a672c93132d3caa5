use std::process::Command;

#[test]
fn test_version_flag() {
    let binary_path = env!("CARGO_BIN_EXE_farmup");

    let output = Command::new(binary_path)
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    assert!(
        output.status.success(),
        "Version flag should exit with code 0"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout.trim().strip_prefix("farmup ").unwrap_or("");
    assert_eq!(
        version,
        env!("CARGO_PKG_VERSION"),
        "Binary version should match CARGO_PKG_VERSION"
    );
}

#[test]
fn test_short_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_farmup"))
        .arg("-V")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("farmup "));
}

#[test]
fn test_failed_check_still_exits_zero() {
    // No package.json: the session fails before any network access.
    let dir = tempfile::TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_farmup"))
        .arg("--check")
        .env("FARMUP_WORK_DIR", dir.path())
        .env("RUST_LOG", "farmup=info")
        .output()
        .expect("Failed to execute binary");

    assert!(
        output.status.success(),
        "A session that does not restart should exit with code 0"
    );
    let logs = String::from_utf8_lossy(&output.stdout);
    assert!(logs.contains("E_LOCAL_READ"), "unexpected output: {}", logs);
}
