//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! let fx = UpdateFixture::new("1.0.0");
//! fx.remote_version("1.1.0");
//! let report = fx.orchestrator(true).run().await;
//! ```

#![allow(dead_code)]

use serde_json::json;
use std::io::{Cursor, Write};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use farmup::adapters::mock::{
    CapturingLog, MockConfirm, MockHttpClient, MockProcessRunner, MockResponse,
};
use farmup::config::UpdaterConfig;
use farmup::update::{RetryPolicy, UpdateOrchestrator, UpdaterDeps};

pub const MANIFEST_URL: &str = "https://updates.test/package.json";
pub const ARCHIVE_URL: &str = "https://updates.test/archive/master.zip";

/// Write a `package.json` carrying `version` into `dir`.
pub fn write_manifest(dir: &std::path::Path, version: &str) {
    std::fs::write(
        dir.join("package.json"),
        json!({ "name": "advanced-discord-owo-tool-farm", "version": version }).to_string(),
    )
    .unwrap();
}

/// Build an in-memory zip. `None` contents add a directory entry.
pub fn zip_bytes(entries: &[(&str, Option<&str>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        match contents {
            Some(contents) => {
                writer.start_file(*name, options).unwrap();
                writer.write_all(contents.as_bytes()).unwrap();
            }
            None => writer.add_directory(*name, options).unwrap(),
        }
    }
    writer.finish().unwrap().into_inner()
}

/// A working directory plus every mocked collaborator.
pub struct UpdateFixture {
    pub work: TempDir,
    pub extract: TempDir,
    pub http: MockHttpClient,
    pub process: MockProcessRunner,
    pub log: CapturingLog,
}

impl UpdateFixture {
    pub fn new(local_version: &str) -> Self {
        let work = TempDir::new().unwrap();
        write_manifest(work.path(), local_version);
        Self {
            work,
            extract: TempDir::new().unwrap(),
            http: MockHttpClient::new(),
            process: MockProcessRunner::new(),
            log: CapturingLog::new(),
        }
    }

    /// Mark the working directory as a git checkout.
    pub fn tracked(self) -> Self {
        std::fs::create_dir(self.work.path().join(".git")).unwrap();
        self
    }

    pub fn remote_version(&self, version: &str) {
        self.http
            .set_response(MANIFEST_URL, MockResponse::json(json!({ "version": version })));
    }

    pub fn release_archive(&self, entries: &[(&str, Option<&str>)]) {
        self.http
            .set_response(ARCHIVE_URL, MockResponse::bytes(zip_bytes(entries)));
    }

    pub fn config(&self) -> UpdaterConfig {
        UpdaterConfig::default()
            .with_work_dir(self.work.path())
            .with_extract_dir(self.extract.path())
            .with_manifest_url(MANIFEST_URL)
            .with_archive_url(ARCHIVE_URL)
            .with_retry_policy(RetryPolicy::new(3, Duration::from_millis(1000), 2.0))
    }

    pub fn orchestrator(&self, answer: bool) -> (UpdateOrchestrator, MockConfirm) {
        let confirm = MockConfirm::answering(answer);
        let orchestrator = UpdateOrchestrator::new(
            self.config(),
            UpdaterDeps {
                http: Arc::new(self.http.clone()),
                process: Arc::new(self.process.clone()),
                confirm: Arc::new(confirm.clone()),
                log: Arc::new(self.log.clone()),
            },
        );
        (orchestrator, confirm)
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.work.path().join(relative)).unwrap()
    }
}
