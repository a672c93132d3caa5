//! Operator confirmation abstraction.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to read answer: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt task aborted: {0}")]
    Aborted(String),
}

/// Asks the operator a yes/no question.
#[async_trait]
pub trait Confirm: Send + Sync {
    /// Present `message` and return the answer, `default` on an empty reply.
    async fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError>;
}
