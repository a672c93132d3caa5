//! Exponential-backoff retry for fallible async operations.
//!
//! Every failure is treated as retryable. After `max_retries` retries the last
//! error is handed back inside [`RetryExhausted`].

use std::fmt;
use std::future::Future;
use std::time::Duration;

use super::logger::{UpdateEvent, UpdateLogger};

/// Backoff parameters.
///
/// The delay before retry `n` (1-based) is
/// `initial_delay * backoff_multiplier^(n-1)`, and an operation runs at most
/// `max_retries + 1` times. The multiplier is never below 1, so delays never
/// shrink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Multipliers below 1 or not finite are clamped to 1.
    pub fn new(max_retries: u32, initial_delay: Duration, backoff_multiplier: f64) -> Self {
        Self {
            max_retries,
            initial_delay,
            backoff_multiplier: clamp_multiplier(backoff_multiplier),
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Upper bound on invocations of the operation.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay slept before retry `n` (1-based). `n == 0` has no delay.
    pub fn delay_for_attempt(&self, n: u32) -> Duration {
        if n == 0 {
            return Duration::ZERO;
        }
        let mut delay = self.initial_delay;
        for _ in 1..n {
            let next = self.next_delay(delay);
            if next == delay {
                break;
            }
            delay = next;
        }
        delay
    }

    /// Never shorter than `delay`. A product that does not fit a `Duration`
    /// keeps `delay`.
    fn next_delay(&self, delay: Duration) -> Duration {
        let product = delay.as_secs_f64() * clamp_multiplier(self.backoff_multiplier);
        Duration::try_from_secs_f64(product)
            .ok()
            .filter(|next| *next >= delay)
            .unwrap_or(delay)
    }
}

fn clamp_multiplier(multiplier: f64) -> f64 {
    if multiplier.is_finite() && multiplier >= 1.0 {
        multiplier
    } else {
        1.0
    }
}

/// Every attempt failed.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryExhausted<E> {
    /// Number of times the operation ran
    pub attempts: u32,
    /// Error from the final attempt
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gave up after {} attempts: {}",
            self.attempts, self.last_error
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryExhausted<E> {}

/// Runs an operation under a [`RetryPolicy`], logging each scheduled retry.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    logger: UpdateLogger,
}

impl RetryExecutor {
    pub fn new(logger: UpdateLogger) -> Self {
        Self { logger }
    }

    /// Run `operation` until it succeeds or the policy is exhausted.
    ///
    /// `label` names the operation in log lines.
    pub async fn execute<T, E, F, Fut>(
        &self,
        label: &str,
        policy: &RetryPolicy,
        mut operation: F,
    ) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut attempts_left = policy.max_retries;
        let mut delay = policy.initial_delay;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if attempts_left == 0 {
                return Err(RetryExhausted {
                    attempts,
                    last_error: error,
                });
            }

            self.logger.log(&UpdateEvent::RetryScheduled {
                operation: label.to_string(),
                error: error.to_string(),
                delay,
                attempts_left,
            });
            tokio::time::sleep(delay).await;

            delay = policy.next_delay(delay);
            attempts_left -= 1;
        }
    }
}
