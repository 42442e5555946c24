//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::api::{ApiClient, ApiError, ApiFuture, Method, STATUS_NOT_FOUND};

/// Scripted API client that returns pre-seeded responses in FIFO order.
///
/// Used to drive deterministic API outcomes without a network. Clones share
/// the same queue and invocation log.
#[derive(Clone, Debug, Default)]
pub struct ScriptedApiClient {
    responses: Arc<Mutex<VecDeque<Result<Value, ApiError>>>>,
    invocations: Arc<Mutex<Vec<ApiInvocation>>>,
}

/// Records a single call made through [`ScriptedApiClient`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApiInvocation {
    /// Verb of the call.
    pub method: Method,
    /// Path of the call.
    pub path: String,
    /// JSON body, when one was sent.
    pub body: Option<Value>,
}

impl ApiInvocation {
    /// Returns `"VERB path"` for assertions.
    #[must_use]
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedApiClient {
    /// Creates a client with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<ApiInvocation> {
        lock(&self.invocations).clone()
    }

    /// Returns the recorded invocations as `"VERB path"` lines.
    #[must_use]
    pub fn call_lines(&self) -> Vec<String> {
        self.invocations().iter().map(ApiInvocation::line).collect()
    }

    /// Returns the request bodies in call order, `None` for bodyless calls.
    #[must_use]
    pub fn bodies(&self) -> Vec<Option<Value>> {
        self.invocations().into_iter().map(|call| call.body).collect()
    }

    /// Number of responses still queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.responses).len()
    }

    /// Pushes a successful JSON response.
    pub fn push_json(&self, value: Value) {
        lock(&self.responses).push_back(Ok(value));
    }

    /// Pushes a successful empty response (decoded as `null`).
    pub fn push_empty(&self) {
        self.push_json(Value::Null);
    }

    /// Pushes a non-2xx response.
    pub fn push_status(&self, status: u16, message: impl Into<String>) {
        lock(&self.responses).push_back(Err(ApiError::Status {
            status,
            message: message.into(),
        }));
    }

    /// Pushes a 404 response.
    pub fn push_not_found(&self) {
        self.push_status(STATUS_NOT_FOUND, "The requested object does not exist");
    }

    fn respond(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        lock(&self.invocations).push(ApiInvocation {
            method,
            path: path.to_owned(),
            body: body.cloned(),
        });
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::Transport {
                    message: format!("no scripted response available for {method} {path}"),
                })
            })
    }
}

impl ApiClient for ScriptedApiClient {
    fn call<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        body: Option<&'a Value>,
    ) -> ApiFuture<'a, Value> {
        let result = self.respond(method, path, body);
        Box::pin(async move { result })
    }
}
