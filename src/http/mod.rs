//! HTTP calling module
//!
//! Paced, self-adjusting API calls.
//!
//! # Features
//!
//! - **Pacing**: a per-variant wait before every request
//! - **Adaptive backoff**: 429s grow the wait, timeouts grow the timeout,
//!   successes shrink the wait back toward its floor
//! - **Unbounded retries**: throttling and timeouts are never surfaced
//! - **Pluggable transport**: `reqwest` by default

mod caller;
mod executor;
mod response;
mod state;
mod transport;

pub use caller::{ApiCaller, Credential, Endpoint};
pub use executor::CallExecutor;
pub use response::{render_response, response_dict};
pub use state::CallerState;
pub use transport::{
    CallOptions, CallRequest, ReqwestTransport, Transport, TransportError, TransportResponse,
};
