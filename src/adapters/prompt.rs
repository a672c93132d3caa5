//! Terminal confirmation prompts.

use async_trait::async_trait;
use std::io::{BufRead, Write};

use crate::traits::{Confirm, PromptError};

/// Yes/no prompt on stdin/stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl StdinPrompt {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Confirm for StdinPrompt {
    async fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
        let message = message.to_string();
        tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            ask(&mut stdin.lock(), &mut stdout.lock(), &message, default)
        })
        .await
        .map_err(|e| PromptError::Aborted(e.to_string()))?
        .map_err(PromptError::from)
    }
}

/// Always answers the same way without asking. Backs the `--yes` flag.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm {
    answer: bool,
}

impl AutoConfirm {
    pub fn new(answer: bool) -> Self {
        Self { answer }
    }
}

#[async_trait]
impl Confirm for AutoConfirm {
    async fn confirm(&self, _message: &str, _default: bool) -> Result<bool, PromptError> {
        Ok(self.answer)
    }
}

/// Ask until a recognisable answer arrives. Empty input and EOF give `default`.
fn ask<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    default: bool,
) -> std::io::Result<bool> {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    loop {
        write!(writer, "? {} {} ", message, hint)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            writeln!(writer)?;
            return Ok(default);
        }

        match line.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(writer, "Please answer 'y' or 'n'.")?,
        }
    }
}
