//! Logging capability handed to every update component.
//!
//! Components receive an `Arc<dyn UpdateLog>` instead of reaching for a global
//! logger, so a test can swap in a capturing implementation.

/// Four-level logging sink.
pub trait UpdateLog: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}
