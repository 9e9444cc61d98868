//! Scripted transport for unit tests

use crate::config::BackoffConfig;
use crate::error::Error;
use crate::http::{CallExecutor, CallRequest, CallerState, Transport, TransportError, TransportResponse};
use crate::types::{CallerVariant, JsonValue};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the scripted transport does for one request
#[derive(Debug)]
pub enum Step {
    Respond(TransportResponse),
    Timeout,
    Fail(String),
}

impl Step {
    pub fn json(status: u16, body: JsonValue) -> Self {
        Step::Respond(TransportResponse::json_body(status, &body))
    }

    pub fn status(status: u16) -> Self {
        Step::Respond(TransportResponse::new(status, ""))
    }
}

/// Replays a fixed list of steps and records every request
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<CallRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CallRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    pub fn remaining(&self) -> usize {
        self.steps.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: CallRequest) -> Result<TransportResponse, TransportError> {
        let timeout = request.timeout;
        self.requests.lock().unwrap().push(request);
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted transport ran out of steps");
        match step {
            Step::Respond(response) => Ok(response),
            Step::Timeout => Err(TransportError::Timeout { after: timeout }),
            Step::Fail(message) => Err(TransportError::Other(Error::Other(message))),
        }
    }
}

/// Backoff values small enough to keep tests fast
pub fn fast_backoff() -> BackoffConfig {
    BackoffConfig::builder()
        .wait_seconds(0.004)
        .min_wait_seconds(0.001)
        .timeout_seconds(0.5)
        .increase_scalar(2.0)
        .decrease_scalar(0.5)
        .build()
        .unwrap()
}

/// Executor over a scripted transport with [`fast_backoff`] for both variants
pub fn fast_executor(steps: impl IntoIterator<Item = Step>) -> CallExecutor<ScriptedTransport> {
    CallExecutor::with_states(
        ScriptedTransport::new(steps),
        CallerState::new(CallerVariant::Read, fast_backoff()),
        CallerState::new(CallerVariant::Write, fast_backoff()),
    )
}
