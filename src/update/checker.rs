//! Version checking.
//!
//! Reads the installed version from the local manifest, fetches the upstream
//! manifest and decides whether an update is available.
//!
//! Versions are compared as plain strings by default, which orders `"1.10.0"`
//! before `"1.2.0"`. That matches what deployed installs have always done, so
//! it stays the default; [`VersionOrdering::Semantic`] is available as an
//! explicit opt-in.

use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::errors::UpdateError;
use super::logger::{UpdateEvent, UpdateLogger};
use super::retry::RetryExecutor;
use crate::config::UpdaterConfig;
use crate::traits::HttpClient;

/// How two version strings are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionOrdering {
    /// Byte-wise string comparison
    #[default]
    Ordinal,
    /// `major.minor[.patch][-pre]`, falling back to ordinal when either side
    /// does not parse
    Semantic,
}

impl FromStr for VersionOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ordinal" | "string" => Ok(VersionOrdering::Ordinal),
            "semver" | "semantic" => Ok(VersionOrdering::Semantic),
            other => Err(format!("unknown version ordering: {}", other)),
        }
    }
}

/// An opaque version identifier as found in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare under `ordering`.
    pub fn compare(&self, other: &Version, ordering: VersionOrdering) -> Ordering {
        match ordering {
            VersionOrdering::Ordinal => self.0.cmp(&other.0),
            VersionOrdering::Semantic => match (SemVer::parse(&self.0), SemVer::parse(&other.0)) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => self.0.cmp(&other.0),
            },
        }
    }

    /// True when `self` sorts strictly before `other`.
    pub fn is_older_than(&self, other: &Version, ordering: VersionOrdering) -> bool {
        self.compare(other, ordering) == Ordering::Less
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed semantic version for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SemVer {
    major: u32,
    minor: u32,
    patch: u32,
    prerelease: Option<String>,
}

impl SemVer {
    fn parse(version: &str) -> Option<Self> {
        let version = version.strip_prefix('v').unwrap_or(version);

        let (version_part, prerelease) = match version.split_once('-') {
            Some((v, pre)) => (v, Some(pre.to_string())),
            None => (version, None),
        };

        let parts: Vec<&str> = version_part.split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return None;
        }

        let major = parts[0].parse().ok()?;
        let minor = parts[1].parse().ok()?;
        let patch = match parts.get(2) {
            Some(p) => p.parse().ok()?,
            None => 0,
        };

        Some(Self {
            major,
            minor,
            patch,
            prerelease,
        })
    }
}

impl PartialOrd for SemVer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemVer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                // 1.0.0-alpha < 1.0.0
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

/// The part of a `package.json` the updater cares about.
#[derive(Debug, Deserialize)]
struct Manifest {
    version: String,
}

/// Outcome of a version check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCheck {
    pub up_to_date: bool,
    pub local: Version,
    pub remote: Version,
}

/// Read the `version` field of a local manifest.
pub async fn read_local_version(path: &Path) -> Result<Version, UpdateError> {
    let local_read = |message: String| UpdateError::LocalRead {
        path: path.to_path_buf(),
        message,
    };

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| local_read(e.to_string()))?;
    let manifest: Manifest = serde_json::from_str(&text).map_err(|e| local_read(e.to_string()))?;
    Ok(Version::new(manifest.version))
}

/// Compares the installed version against upstream.
pub struct VersionChecker {
    http: Arc<dyn HttpClient>,
    config: Arc<UpdaterConfig>,
    logger: UpdateLogger,
    retry: RetryExecutor,
}

impl VersionChecker {
    pub fn new(http: Arc<dyn HttpClient>, config: Arc<UpdaterConfig>, logger: UpdateLogger) -> Self {
        let retry = RetryExecutor::new(logger.clone());
        Self {
            http,
            config,
            logger,
            retry,
        }
    }

    /// Run the check.
    ///
    /// Fails with [`UpdateError::LocalRead`] without touching the network when
    /// the local manifest is unusable, and with [`UpdateError::RetryExhausted`]
    /// when every fetch attempt failed.
    pub async fn check(&self) -> Result<VersionCheck, UpdateError> {
        self.logger.log(&UpdateEvent::CheckStarted);

        let local = read_local_version(&self.config.local_manifest_path()).await?;
        let remote = self.fetch_remote_version().await?;

        let up_to_date = !local.is_older_than(&remote, self.config.version_ordering);
        if up_to_date {
            self.logger.log(&UpdateEvent::UpToDate {
                current_version: local.to_string(),
            });
        } else {
            self.logger.log(&UpdateEvent::UpdateAvailable {
                current_version: local.to_string(),
                latest_version: remote.to_string(),
            });
        }

        Ok(VersionCheck {
            up_to_date,
            local,
            remote,
        })
    }

    async fn fetch_remote_version(&self) -> Result<Version, UpdateError> {
        const OPERATION: &str = "Fetching remote manifest";

        let http = &*self.http;
        let url = self.config.manifest_url.as_str();
        let headers = &self.config.request_headers();
        let timeout = self.config.manifest_timeout;

        let response = self
            .retry
            .execute(OPERATION, &self.config.retry_policy, move || async move {
                http.get(url, headers, timeout).await?.error_for_status()
            })
            .await
            .map_err(|exhausted| UpdateError::RetryExhausted {
                operation: OPERATION.to_string(),
                attempts: exhausted.attempts,
                last_error: exhausted.last_error,
            })?;

        let manifest: Manifest = response
            .json()
            .map_err(|e| UpdateError::InvalidResponse {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(Version::new(manifest.version))
    }
}
