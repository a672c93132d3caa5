//! [`UpdateLog`] implementation on top of `tracing`.

use crate::traits::UpdateLog;

/// Forwards update log lines to `tracing` under the `farmup::update` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl TracingLog {
    pub fn new() -> Self {
        Self
    }
}

impl UpdateLog for TracingLog {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "farmup::update", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "farmup::update", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "farmup::update", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "farmup::update", "{}", message);
    }
}
