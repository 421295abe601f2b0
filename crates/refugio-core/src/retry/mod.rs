//! Retry and backoff policy.
//!
//! This module encapsulates error classification (transport failures,
//! throttling, malformed payloads) and exponential backoff decisions so the
//! generation executor can stay a thin loop around one HTTP call.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify_curl_error, RetryRules};
pub use error::{AttemptError, TransportError, TransportErrorKind};
pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, AttemptState, RetryFailure};
