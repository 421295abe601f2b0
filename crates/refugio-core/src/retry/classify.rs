//! Classify curl errors and attempt failures for retry decisions.

use super::error::{AttemptError, TransportError, TransportErrorKind};
use crate::config::RetryConfig;

/// Which attempt failures count as transient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryRules {
    /// Statuses that are retried (rate limiting and 5xx by default).
    pub retry_on_status: Vec<u16>,
    pub retry_transport: bool,
    pub retry_malformed: bool,
}

impl Default for RetryRules {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryRules {
    pub fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            retry_on_status: cfg.retry_on_status.clone(),
            retry_transport: cfg.retry_transport,
            retry_malformed: cfg.retry_malformed,
        }
    }

    /// True when another attempt may succeed where this one failed.
    pub fn is_retryable(&self, e: &AttemptError) -> bool {
        match e {
            AttemptError::Transport(_) => self.retry_transport,
            AttemptError::Http { status, .. } => self.retry_on_status.contains(status),
            AttemptError::Malformed { .. } => self.retry_malformed,
        }
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> TransportErrorKind {
    if e.is_operation_timedout() {
        return TransportErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return TransportErrorKind::Connection;
    }
    TransportErrorKind::Other
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        TransportError::new(classify_curl_error(&e), e.to_string())
    }
}
