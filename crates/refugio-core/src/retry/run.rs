//! Retry loop: run an async attempt until success or the policy says stop.

use std::future::Future;
use std::time::Duration;

use super::classify::RetryRules;
use super::error::AttemptError;
use super::policy::{RetryDecision, RetryPolicy};

/// Bookkeeping for one logical call. Never shared between calls.
#[derive(Debug)]
pub struct AttemptState {
    attempt: u32,
    delay: Duration,
    last_error: Option<AttemptError>,
}

impl AttemptState {
    pub fn new(base_delay: Duration) -> Self {
        Self {
            attempt: 0,
            delay: base_delay,
            last_error: None,
        }
    }

    /// Number of attempts started so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Sleep to take before the next attempt if the current one fails.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn last_error(&self) -> Option<&AttemptError> {
        self.last_error.as_ref()
    }

    fn begin(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    fn backoff(&mut self, policy: &RetryPolicy, error: AttemptError) {
        self.delay = policy.next_delay(self.delay);
        self.last_error = Some(error);
    }
}

/// Terminal outcome of a call that did not succeed.
#[derive(Debug)]
pub enum RetryFailure {
    /// `is_retryable` rejected the error.
    Rejected { attempt: u32, error: AttemptError },
    /// Every attempt failed with a retryable error.
    Exhausted { attempts: u32, last: AttemptError },
}

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// `f` receives the 1-based attempt number. On a retryable failure the loop
/// suspends for the current backoff delay (without blocking the runtime), then
/// grows the delay by the policy's factor.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    rules: &RetryRules,
    mut f: F,
) -> Result<T, RetryFailure>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let mut state = AttemptState::new(policy.base_delay);
    loop {
        let attempt = state.begin();
        match f(attempt).await {
            Ok(value) => {
                if let Some(prev) = state.last_error() {
                    tracing::info!(attempt, "succeeded after retry (last error: {})", prev);
                }
                return Ok(value);
            }
            Err(error) => {
                let retryable = rules.is_retryable(&error);
                match policy.decide(attempt, retryable, state.delay()) {
                    RetryDecision::NoRetry => {
                        tracing::warn!(attempt, "terminal error: {}", error);
                        return Err(RetryFailure::Rejected { attempt, error });
                    }
                    RetryDecision::Exhausted => {
                        tracing::warn!(attempt, "retries exhausted: {}", error);
                        return Err(RetryFailure::Exhausted {
                            attempts: attempt,
                            last: error,
                        });
                    }
                    RetryDecision::RetryAfter(delay) => {
                        tracing::debug!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "retryable error: {}",
                            error
                        );
                        state.backoff(policy, error);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}
