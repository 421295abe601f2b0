//! Turn an HTTP reply from the predict endpoint into image bytes or an attempt error.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use super::transport::HttpReply;
use crate::retry::AttemptError;

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `error.message` from a failure body, if the body is JSON and has one.
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
}

/// Extract the decoded image from `predictions[0].bytesBase64Encoded`.
///
/// Non-2xx replies become `AttemptError::Http`; a 2xx reply without a usable,
/// non-empty payload becomes `AttemptError::Malformed`.
pub fn parse_reply(reply: &HttpReply) -> Result<Vec<u8>, AttemptError> {
    let status = reply.status;
    if !(200..300).contains(&status) {
        let message = error_message(&reply.body).unwrap_or_else(|| format!("HTTP {}", status));
        return Err(AttemptError::Http { status, message });
    }

    let malformed = |detail: String| AttemptError::Malformed { status, detail };

    let parsed: PredictResponse = serde_json::from_slice(&reply.body)
        .map_err(|e| malformed(format!("invalid JSON: {}", e)))?;
    let encoded = parsed
        .predictions
        .into_iter()
        .next()
        .and_then(|p| p.bytes_base64_encoded)
        .ok_or_else(|| malformed("missing predictions[0].bytesBase64Encoded".to_string()))?;
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| malformed(format!("invalid base64: {}", e)))?;
    if bytes.is_empty() {
        return Err(malformed("empty image payload".to_string()));
    }
    Ok(bytes)
}
