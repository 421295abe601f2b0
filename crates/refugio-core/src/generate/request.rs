//! Immutable description of one generation request.

use serde_json::{json, Value};
use url::Url;

use super::error::GenerateError;
use super::styles::Style;
use crate::config::InstancesShape;

/// Endpoint, prompt and body shape for one logical request.
///
/// Built purely from the style and endpoint settings, so replaying it on retry
/// sends the same bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    url: Url,
    prompt: String,
    shape: InstancesShape,
    sample_count: u32,
}

impl RequestSpec {
    pub fn for_style(
        style: &Style,
        endpoint: &str,
        api_key: &str,
        shape: InstancesShape,
        sample_count: u32,
    ) -> Result<Self, GenerateError> {
        let mut url = Url::parse(endpoint).map_err(|e| {
            GenerateError::Configuration(format!("invalid endpoint {:?}: {}", endpoint, e))
        })?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(Self {
            url,
            prompt: style.prompt_text(),
            shape,
            sample_count,
        })
    }

    /// Full URL including the API key. Do not log this.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// URL with the key replaced, for logs and diagnostics.
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        let pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(k, v)| {
                let v = if k == "key" { "***".to_string() } else { v.into_owned() };
                (k.into_owned(), v)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        url.to_string()
    }

    pub fn body(&self) -> Value {
        let instance = json!({ "prompt": self.prompt });
        let instances = match self.shape {
            InstancesShape::Array => Value::Array(vec![instance]),
            InstancesShape::Object => instance,
        };
        json!({
            "instances": instances,
            "parameters": { "sampleCount": self.sample_count },
        })
    }

    pub fn body_bytes(&self) -> Vec<u8> {
        self.body().to_string().into_bytes()
    }
}
