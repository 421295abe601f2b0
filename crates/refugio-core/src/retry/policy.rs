use anyhow::Result;
use std::time::Duration;

use crate::config::RetryConfig;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The error is terminal; do not retry.
    NoRetry,
    /// The error was transient but the attempt budget is spent.
    Exhausted,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy: `base, base*f, base*f^2, ...` between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Growth factor per failed attempt (> 1).
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(1000),
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Build from `[retry]`, rejecting values that would break the backoff invariants.
    pub fn from_config(cfg: &RetryConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            max_attempts: cfg.max_attempts,
            base_delay: Duration::from_millis(cfg.base_delay_ms),
            backoff_factor: cfg.backoff_factor,
        })
    }

    /// Delay that follows `current`. Always strictly larger; saturates at `u64::MAX` ms.
    pub fn next_delay(&self, current: Duration) -> Duration {
        let current_ms = u64::try_from(current.as_millis()).unwrap_or(u64::MAX);
        let scaled = (current_ms as f64 * self.backoff_factor).ceil();
        let next_ms = if scaled.is_finite() && scaled < u64::MAX as f64 {
            scaled as u64
        } else {
            u64::MAX
        };
        Duration::from_millis(next_ms.max(current_ms.saturating_add(1)))
    }

    /// The sleeps a fully failing call goes through (`max_attempts - 1` entries).
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.base_delay), move |d| Some(self.next_delay(*d)))
            .take(self.max_attempts.saturating_sub(1) as usize)
    }

    /// Decide what to do after `attempt` (1-based) failed.
    ///
    /// `current_delay` is the caller's running backoff; it is returned as-is so
    /// the caller owns the growth step.
    pub fn decide(&self, attempt: u32, retryable: bool, current_delay: Duration) -> RetryDecision {
        if !retryable {
            return RetryDecision::NoRetry;
        }
        if attempt >= self.max_attempts {
            return RetryDecision::Exhausted;
        }
        RetryDecision::RetryAfter(current_delay)
    }
}
