//! Updater configuration.
//!
//! Defaults reproduce the behaviour of the farm tool's original updater.
//! Individual values can be changed with the `with_*` builder methods or
//! overridden from `FARMUP_*` environment variables via
//! [`UpdaterConfig::from_env`].

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::traits::{CommandSpec, Headers};
use crate::update::checker::VersionOrdering;
use crate::update::retry::RetryPolicy;

/// Raw URL of the upstream `package.json`.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://github.com/Kyou-Izumi/advanced-discord-owo-tool-farm/raw/refs/heads/main/package.json";

/// Zip of the upstream default branch.
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://github.com/Kyou-Izumi/advanced-discord-owo-tool-farm/archive/master.zip";

/// GitHub rejects some requests without a browser-like agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537";

/// Configuration for one update session.
///
/// # Example
///
/// ```ignore
/// use farmup::config::UpdaterConfig;
///
/// let config = UpdaterConfig::default()
///     .with_work_dir("/srv/farm")
///     .with_install_command("pnpm install");
/// ```
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Application directory that gets updated in place
    pub work_dir: PathBuf,
    /// Local manifest, relative to `work_dir`
    pub manifest_file: PathBuf,
    pub manifest_url: String,
    pub archive_url: String,
    pub user_agent: String,
    /// Timeout for the small manifest request
    pub manifest_timeout: Duration,
    /// Timeout for the archive download
    pub archive_timeout: Duration,
    pub retry_policy: RetryPolicy,
    pub version_ordering: VersionOrdering,
    /// Version-control program, probed with `--version`
    pub vcs_program: String,
    /// Marker directory of a tracked working tree, relative to `work_dir`
    pub vcs_metadata_dir: PathBuf,
    /// Remote passed to `pull`; the tracking remote when unset
    pub vcs_remote: Option<String>,
    /// Branch passed to `pull`; only used together with `vcs_remote`
    pub vcs_branch: Option<String>,
    /// Shell command that reinstalls dependencies
    pub install_command: String,
    /// Shell command that starts the application
    pub start_command: String,
    /// Where release archives are extracted
    pub extract_dir: PathBuf,
    /// Exit status of the old process after a restart is spawned
    pub restart_exit_code: i32,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            manifest_file: PathBuf::from("package.json"),
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            manifest_timeout: Duration::from_secs(10),
            archive_timeout: Duration::from_secs(30),
            retry_policy: RetryPolicy::default(),
            version_ordering: VersionOrdering::Ordinal,
            vcs_program: "git".to_string(),
            vcs_metadata_dir: PathBuf::from(".git"),
            vcs_remote: None,
            vcs_branch: None,
            install_command: "npm install".to_string(),
            start_command: "npm start".to_string(),
            extract_dir: std::env::temp_dir(),
            restart_exit_code: 1,
        }
    }
}

impl UpdaterConfig {
    /// Create a new UpdaterConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by any `FARMUP_*` variables that are set.
    ///
    /// Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("FARMUP_WORK_DIR") {
            self.work_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("FARMUP_MANIFEST_URL") {
            self.manifest_url = url;
        }
        if let Some(url) = lookup("FARMUP_ARCHIVE_URL") {
            self.archive_url = url;
        }
        if let Some(retries) = lookup("FARMUP_MAX_RETRIES").and_then(|v| v.parse().ok()) {
            self.retry_policy = self.retry_policy.with_max_retries(retries);
        }
        if let Some(ms) = lookup("FARMUP_INITIAL_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.retry_policy = self.retry_policy.with_initial_delay(Duration::from_millis(ms));
        }
        if let Some(ordering) =
            lookup("FARMUP_VERSION_ORDERING").and_then(|v| VersionOrdering::from_str(&v).ok())
        {
            self.version_ordering = ordering;
        }
        if let Some(cmd) = lookup("FARMUP_INSTALL_CMD") {
            self.install_command = cmd;
        }
        if let Some(cmd) = lookup("FARMUP_START_CMD") {
            self.start_command = cmd;
        }
        self
    }

    pub fn with_work_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.work_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_manifest_url(mut self, url: impl Into<String>) -> Self {
        self.manifest_url = url.into();
        self
    }

    pub fn with_archive_url(mut self, url: impl Into<String>) -> Self {
        self.archive_url = url.into();
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_version_ordering(mut self, ordering: VersionOrdering) -> Self {
        self.version_ordering = ordering;
        self
    }

    pub fn with_vcs_remote(mut self, remote: impl Into<String>, branch: Option<String>) -> Self {
        self.vcs_remote = Some(remote.into());
        self.vcs_branch = branch;
        self
    }

    pub fn with_install_command(mut self, command: impl Into<String>) -> Self {
        self.install_command = command.into();
        self
    }

    pub fn with_start_command(mut self, command: impl Into<String>) -> Self {
        self.start_command = command.into();
        self
    }

    pub fn with_extract_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.extract_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Absolute path of the local manifest.
    pub fn local_manifest_path(&self) -> PathBuf {
        self.work_dir.join(&self.manifest_file)
    }

    /// Absolute path of the VCS marker directory.
    pub fn vcs_metadata_path(&self) -> PathBuf {
        self.work_dir.join(&self.vcs_metadata_dir)
    }

    /// Headers sent with every request.
    pub fn request_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        headers
    }

    /// Command that relaunches the application in the working directory.
    ///
    /// On Windows the start command gets its own console window. Elsewhere it
    /// runs in a new session with no controlling terminal and its stdio goes
    /// to `/dev/null`, so its console output is not visible.
    pub fn restart_command(&self) -> CommandSpec {
        #[cfg(windows)]
        let line = format!("start cmd.exe /K {}", self.start_command);
        #[cfg(not(windows))]
        let line = self.start_command.clone();

        CommandSpec::shell(&line).current_dir(&self.work_dir)
    }
}
