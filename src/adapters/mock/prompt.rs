//! Scripted confirmation prompt.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::traits::{Confirm, PromptError};

/// Answers with a fixed value and remembers every question asked.
#[derive(Debug, Clone)]
pub struct MockConfirm {
    answer: bool,
    asked: Arc<Mutex<Vec<String>>>,
}

impl MockConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Questions asked so far.
    pub fn questions(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    pub fn times_asked(&self) -> usize {
        self.asked.lock().unwrap().len()
    }
}

#[async_trait]
impl Confirm for MockConfirm {
    async fn confirm(&self, message: &str, _default: bool) -> Result<bool, PromptError> {
        self.asked.lock().unwrap().push(message.to_string());
        Ok(self.answer)
    }
}
