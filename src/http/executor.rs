//! Paced call executor
//!
//! Runs one logical call to completion:
//! - waits the variant's current wait before every attempt
//! - retries 429s after growing the wait
//! - retries timeouts after growing the timeout
//! - shrinks the wait once the call finally succeeds
//!
//! Retries are unbounded. Whoever runs the process is expected to stop a
//! call that keeps getting throttled.

use super::caller::ApiCaller;
use super::response::{parse_object, render_response};
use super::state::CallerState;
use super::transport::{CallRequest, ReqwestTransport, Transport, TransportError, TransportResponse};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{CallerVariant, JsonObject};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of one physical attempt that did not fail terminally
#[derive(Debug)]
enum Attempt {
    Success(JsonObject),
    RateLimited,
    TimedOut,
}

/// Executes calls against a transport with shared per-variant pacing
///
/// Clones share the transport and both [`CallerState`]s.
pub struct CallExecutor<T = ReqwestTransport> {
    transport: Arc<T>,
    read: CallerState,
    write: CallerState,
}

impl<T> Clone for CallExecutor<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            read: self.read.clone(),
            write: self.write.clone(),
        }
    }
}

impl CallExecutor<ReqwestTransport> {
    /// Executor over `reqwest` with the default pacing
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(ReqwestTransport::new()?))
    }

    /// Executor over `reqwest` with pacing and user agent from a config
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::with_user_agent(&config.user_agent)?;
        Ok(Self::with_states(
            transport,
            CallerState::new(CallerVariant::Read, config.read),
            CallerState::new(CallerVariant::Write, config.write),
        ))
    }
}

impl<T: Transport> CallExecutor<T> {
    /// Executor over a custom transport with the default pacing
    pub fn with_transport(transport: T) -> Self {
        Self::with_states(transport, CallerState::read(), CallerState::write())
    }

    /// Executor over a custom transport with explicit state handles
    ///
    /// Pass clones of existing handles to share pacing with other executors.
    pub fn with_states(transport: T, read: CallerState, write: CallerState) -> Self {
        Self {
            transport: Arc::new(transport),
            read,
            write,
        }
    }

    /// Pacing state for a variant
    pub fn state(&self, variant: CallerVariant) -> &CallerState {
        match variant {
            CallerVariant::Read => &self.read,
            CallerVariant::Write => &self.write,
        }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Make the call, retrying until it succeeds or fails terminally
    ///
    /// A 204 yields an empty object. On success the variant's wait is
    /// decreased once, however many attempts were needed.
    ///
    /// # Errors
    ///
    /// - [`Error::HttpStatus`] for an error status other than 429
    /// - [`Error::UnexpectedStatus`] for a non-error status other than 200/204/429
    /// - the transport's own error for failures other than timeouts
    /// - [`Error::JsonParse`] / [`Error::Decode`] when a 200 body is not a JSON object
    pub async fn call_api<C>(&self, caller: &C) -> Result<JsonObject>
    where
        C: ApiCaller + ?Sized,
    {
        let state = self.state(caller.variant());

        let body = loop {
            match self.attempt(caller, state).await? {
                Attempt::Success(body) => break body,
                Attempt::RateLimited => {
                    let wait = state.increase_wait();
                    warn!("Rate limited. Waiting {} seconds to retry.", wait);
                }
                Attempt::TimedOut => {
                    let timeout = state.increase_timeout();
                    warn!(
                        "Request timed out. Trying again with longer timeout: {} seconds.",
                        timeout
                    );
                }
            }
        };

        let wait = state.decrease_wait();
        debug!(
            "{} {} succeeded, {} wait now {}s",
            caller.method(),
            caller.url(),
            state.variant(),
            wait
        );
        Ok(body)
    }

    async fn attempt<C>(&self, caller: &C, state: &CallerState) -> Result<Attempt>
    where
        C: ApiCaller + ?Sized,
    {
        tokio::time::sleep(state.wait()).await;

        let request = CallRequest {
            method: caller.method(),
            url: caller.url().to_string(),
            api_key: caller.api_key()?,
            timeout: state.timeout(),
            options: caller.call_options(),
        };
        debug!("{} {} (timeout {:?})", request.method, request.url, request.timeout);

        match self.transport.send(request).await {
            Ok(response) => classify(&response),
            Err(TransportError::Timeout { after }) => {
                debug!("No response after {:?}", after);
                Ok(Attempt::TimedOut)
            }
            Err(TransportError::Other(e)) => Err(e),
        }
    }
}

impl<T> std::fmt::Debug for CallExecutor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallExecutor")
            .field("read", &self.read)
            .field("write", &self.write)
            .finish_non_exhaustive()
    }
}

fn classify(response: &TransportResponse) -> Result<Attempt> {
    let status = response.status();

    if let Err(e) = response.error_for_status() {
        return if status == 429 {
            Ok(Attempt::RateLimited)
        } else {
            Err(e)
        };
    }

    match status {
        200 => Ok(Attempt::Success(parse_object(response)?)),
        204 => Ok(Attempt::Success(JsonObject::new())),
        // Some servers send 429 without it being flagged as an error.
        429 => Ok(Attempt::RateLimited),
        _ => Err(Error::unexpected_status(status, render_response(response))),
    }
}
