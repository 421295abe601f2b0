//! HTTP transport for the predict endpoint.
//!
//! Uses the curl crate (libcurl). Calls block the current thread; the executor
//! runs them via `spawn_blocking`.

use std::time::Duration;

use crate::config::ImagenConfig;
use crate::retry::{TransportError, TransportErrorKind};

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// One blocking JSON POST. Implemented by curl in production and by scripted
/// doubles in tests.
pub trait Transport: Send + Sync {
    fn post_json(&self, url: &str, body: &[u8]) -> Result<HttpReply, TransportError>;
}

/// libcurl-backed transport.
#[derive(Debug, Clone, Copy)]
pub struct CurlTransport {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::from_config(&ImagenConfig::default())
    }
}

impl CurlTransport {
    pub fn from_config(cfg: &ImagenConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }
}

impl Transport for CurlTransport {
    fn post_json(&self, url: &str, body: &[u8]) -> Result<HttpReply, TransportError> {
        let mut response = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.post(true)?;
        easy.post_fields_copy(body)?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let mut list = curl::easy::List::new();
        list.append("Content-Type: application/json")?;
        list.append("Accept: application/json")?;
        // Send the body straight away instead of waiting on 100-continue.
        list.append("Expect:")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        let status = u16::try_from(code).map_err(|_| {
            TransportError::new(
                TransportErrorKind::Other,
                format!("invalid HTTP status {}", code),
            )
        })?;
        Ok(HttpReply {
            status,
            body: response,
        })
    }
}
