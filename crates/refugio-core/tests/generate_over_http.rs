//! Integration test: real curl transport against a local scripted predict endpoint.
//!
//! Covers retry on throttling, terminal client errors, exhaustion and the
//! request wire format (key in the query string, JSON body shape).

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::predict_server::{self, Reply};
use refugio_core::config::{InstancesShape, RetryConfig};
use refugio_core::generate::{CurlTransport, GenerateError, Generator, GeneratorSettings};

fn generator(url: &str, shape: InstancesShape, max_attempts: u32) -> Generator {
    let settings = GeneratorSettings {
        endpoint: url.to_string(),
        api_key: Some("test-key".to_string()),
        instances_shape: shape,
        sample_count: 1,
        retry: RetryConfig {
            max_attempts,
            base_delay_ms: 20,
            backoff_factor: 2.0,
            ..RetryConfig::default()
        },
    };
    let transport = CurlTransport {
        connect_timeout: Duration::from_secs(5),
        timeout: Duration::from_secs(10),
    };
    Generator::new(settings, Arc::new(transport))
}

#[tokio::test]
async fn throttled_then_success_returns_decoded_bytes() {
    let server = predict_server::start(vec![
        Reply::error(429, "Resource has been exhausted"),
        Reply::image("iVBORw0KGgo="),
    ]);
    let gen = generator(&server.url, InstancesShape::Array, 3);

    let started = Instant::now();
    let artifact = gen.generate("paz").await.expect("generate");
    assert!(started.elapsed() >= Duration::from_millis(20));

    assert_eq!(artifact.bytes(), b"\x89PNG\r\n\x1a\n");
    assert_eq!(artifact.style_id(), "paz");
    assert_eq!(server.request_count(), 2);
}

#[tokio::test]
async fn request_carries_key_and_array_body() {
    let server = predict_server::start(vec![Reply::image("AQID")]);
    let gen = generator(&server.url, InstancesShape::Array, 1);
    gen.generate("amor").await.expect("generate");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].target,
        "/v1beta/models/imagen:predict?key=test-key"
    );
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["instances"].is_array());
    assert!(body["instances"][0]["prompt"]
        .as_str()
        .unwrap()
        .contains("divine love"));
    assert_eq!(body["parameters"]["sampleCount"], 1);
}

#[tokio::test]
async fn legacy_object_shape_is_sent_when_configured() {
    let server = predict_server::start(vec![Reply::image("AQID")]);
    let gen = generator(&server.url, InstancesShape::Object, 1);
    gen.generate("luz").await.expect("generate");

    let body: serde_json::Value = serde_json::from_slice(&server.requests()[0].body).unwrap();
    assert!(body["instances"].is_object());
}

#[tokio::test]
async fn invalid_key_is_upstream_error_after_one_call() {
    let server = predict_server::start(vec![Reply::error(
        400,
        "API key not valid. Please pass a valid API key.",
    )]);
    let gen = generator(&server.url, InstancesShape::Array, 5);

    match gen.generate("fortaleza").await {
        Err(GenerateError::Upstream { status, message }) => {
            assert_eq!(status, Some(400));
            assert!(message.contains("API key not valid"));
        }
        other => panic!("expected Upstream, got {:?}", other),
    }
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn persistent_unavailability_exhausts_retries() {
    let server = predict_server::start(vec![Reply::error(503, "The service is currently unavailable.")]);
    let gen = generator(&server.url, InstancesShape::Array, 3);

    match gen.generate("paz").await {
        Err(GenerateError::ExhaustedRetries { attempts, last }) => {
            assert_eq!(attempts, 3);
            assert_eq!(last.status(), Some(503));
        }
        other => panic!("expected ExhaustedRetries, got {:?}", other),
    }
    assert_eq!(server.request_count(), 3);
}

#[tokio::test]
async fn unreachable_endpoint_exhausts_on_transport_errors() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let url = format!("http://127.0.0.1:{}/predict", port);
    let gen = generator(&url, InstancesShape::Array, 2);

    match gen.generate("paz").await {
        Err(GenerateError::ExhaustedRetries { attempts, last }) => {
            assert_eq!(attempts, 2);
            assert!(last.status().is_none());
        }
        other => panic!("expected ExhaustedRetries, got {:?}", other),
    }
}
