//! Capturing logger for assertions on emitted log lines.

use std::sync::{Arc, Mutex};

use crate::traits::UpdateLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturedLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct CapturingLog {
    lines: Arc<Mutex<Vec<(CapturedLevel, String)>>>,
}

impl CapturingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(CapturedLevel, String)> {
        self.lines.lock().unwrap().clone()
    }

    /// Messages logged at `level`.
    pub fn messages(&self, level: CapturedLevel) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// True if any line at any level contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .any(|(_, m)| m.contains(needle))
    }

    fn push(&self, level: CapturedLevel, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl UpdateLog for CapturingLog {
    fn debug(&self, message: &str) {
        self.push(CapturedLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(CapturedLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(CapturedLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(CapturedLevel::Error, message);
    }
}
