//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use super::transport::{HttpReply, Transport};
use crate::retry::TransportError;

type Scripted = Result<HttpReply, TransportError>;

/// Replays queued replies in order; once the queue is empty, repeats `fallback`.
pub(crate) struct ScriptedTransport {
    queue: Mutex<VecDeque<Scripted>>,
    fallback: Option<Scripted>,
    calls: AtomicU32,
    bodies: Mutex<Vec<Vec<u8>>>,
}

impl ScriptedTransport {
    pub(crate) fn new(replies: Vec<Scripted>) -> Self {
        Self {
            queue: Mutex::new(replies.into()),
            fallback: None,
            calls: AtomicU32::new(0),
            bodies: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn repeating(reply: Scripted) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::new(Vec::new())
        }
    }

    /// 200 with `predictions[0].bytesBase64Encoded = b64`.
    pub(crate) fn ok(b64: &str) -> Scripted {
        Self::status(
            200,
            &format!(r#"{{"predictions":[{{"bytesBase64Encoded":"{}"}}]}}"#, b64),
        )
    }

    pub(crate) fn status(status: u16, body: &str) -> Scripted {
        Ok(HttpReply {
            status,
            body: body.as_bytes().to_vec(),
        })
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn bodies(&self) -> Vec<Vec<u8>> {
        self.bodies.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn post_json(&self, _url: &str, body: &[u8]) -> Result<HttpReply, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().unwrap().push(body.to_vec());
        let next = self.queue.lock().unwrap().pop_front();
        next.or_else(|| self.fallback.clone())
            .expect("scripted transport ran out of replies")
    }
}
