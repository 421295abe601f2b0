//! One logical request against the predict endpoint, with bounded retry.

use std::sync::Arc;

use super::error::GenerateError;
use super::request::RequestSpec;
use super::response::parse_reply;
use super::transport::Transport;
use crate::config::RetryConfig;
use crate::retry::{
    run_with_retry, AttemptError, RetryFailure, RetryPolicy, RetryRules, TransportError,
    TransportErrorKind,
};

/// Sends a `RequestSpec` and retries transient failures with exponential backoff.
///
/// Holds no per-call state; every `execute` gets its own attempt bookkeeping,
/// so one executor can be reused for any number of logical requests.
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    /// Returns the decoded image bytes (never empty) or a typed error.
    ///
    /// Invalid retry settings fail with `Configuration` before any attempt.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<Vec<u8>, GenerateError> {
        let policy = RetryPolicy::from_config(&self.retry)
            .map_err(|e| GenerateError::Configuration(e.to_string()))?;
        let rules = RetryRules::from_config(&self.retry);

        let url = spec.url().to_string();
        let body = Arc::new(spec.body_bytes());
        let redacted = spec.redacted_url();

        let outcome = run_with_retry(&policy, &rules, |attempt| {
            let transport = Arc::clone(&self.transport);
            let url = url.clone();
            let body = Arc::clone(&body);
            let redacted = redacted.as_str();
            async move {
                tracing::debug!(attempt, url = %redacted, "POST predict");
                let reply = tokio::task::spawn_blocking(move || transport.post_json(&url, &body))
                    .await
                    .map_err(|e| {
                        TransportError::new(
                            TransportErrorKind::Other,
                            format!("transport task failed: {}", e),
                        )
                    })??;
                tracing::debug!(attempt, status = reply.status, bytes = reply.body.len(), "reply");
                parse_reply(&reply)
            }
        })
        .await;

        match outcome {
            Ok(bytes) => Ok(bytes),
            Err(RetryFailure::Rejected { error, .. }) => Err(upstream(error)),
            Err(RetryFailure::Exhausted { attempts, last }) => {
                Err(GenerateError::ExhaustedRetries { attempts, last })
            }
        }
    }
}

fn upstream(error: AttemptError) -> GenerateError {
    GenerateError::Upstream {
        status: error.status(),
        message: error.message().to_string(),
    }
}
