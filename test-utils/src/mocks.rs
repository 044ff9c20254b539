//! Mock transport for testing.
//!
//! [`MockTransport`] records every call and answers from a queue of
//! scripted replies. An exhausted queue answers with `null`, which is what
//! an empty 204 response decodes to.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use vault_token::{Transport, TransportError, TransportResult};

/// Transport verb of a recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// GET
    Get,
    /// POST
    Post,
    /// LIST
    List,
    /// DELETE
    Delete,
}

/// A call made through the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Verb used
    pub verb: Verb,
    /// Request path, including any query string
    pub path: String,
    /// Request body, if any
    pub body: Option<String>,
}

impl RecordedCall {
    /// Body decoded as JSON.
    #[must_use]
    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
    }
}

/// Recording, scripted [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    replies: Arc<Mutex<VecDeque<TransportResult<Value>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Create a mock with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    #[must_use]
    pub fn with_reply(self, value: Value) -> Self {
        self.push_reply(Ok(value));
        self
    }

    /// Queue a failing reply.
    #[must_use]
    pub fn with_error(self, err: TransportError) -> Self {
        self.push_reply(Err(err));
        self
    }

    /// Queue a reply on a shared mock.
    pub fn push_reply(&self, reply: TransportResult<Value>) {
        lock(&self.replies).push_back(reply);
    }

    /// All recorded calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// The most recent call.
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        lock(&self.calls).last().cloned()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn record(&self, verb: Verb, path: &str, body: Option<&str>) -> TransportResult<Value> {
        lock(&self.calls).push(RecordedCall {
            verb,
            path: path.to_string(),
            body: body.map(str::to_string),
        });
        lock(&self.replies).pop_front().unwrap_or(Ok(Value::Null))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> TransportResult<Value> {
        self.record(Verb::Get, path, None)
    }

    async fn post(&self, path: &str, body: Option<&str>) -> TransportResult<Value> {
        self.record(Verb::Post, path, body)
    }

    async fn list(&self, path: &str) -> TransportResult<Value> {
        self.record(Verb::List, path, None)
    }

    async fn delete(&self, path: &str) -> TransportResult<Value> {
        self.record(Verb::Delete, path, None)
    }
}
