//! Per-attempt error type for retry classification.

use thiserror::Error;

/// Coarse class of a transport failure, derived from the curl error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connect or overall timeout.
    Timeout,
    /// DNS, connect refused, reset, or nothing received.
    Connection,
    /// Anything else curl reported (bad URL, TLS setup, ...).
    Other,
}

/// The request never produced an HTTP status.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Error returned by a single attempt against the endpoint.
/// Classified by `RetryRules::is_retryable` before the loop decides what to do.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    /// Response had a non-2xx status. `message` is the body's `error.message`
    /// when present.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// 2xx response without a usable image payload.
    #[error("malformed response (HTTP {status}): {detail}")]
    Malformed { status: u16, detail: String },
}

impl AttemptError {
    /// HTTP status of the failed attempt, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            AttemptError::Transport(_) => None,
            AttemptError::Http { status, .. } | AttemptError::Malformed { status, .. } => {
                Some(*status)
            }
        }
    }

    /// Diagnostic text without the status prefix.
    pub fn message(&self) -> &str {
        match self {
            AttemptError::Transport(e) => &e.message,
            AttemptError::Http { message, .. } => message,
            AttemptError::Malformed { detail, .. } => detail,
        }
    }
}
