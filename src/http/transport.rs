//! Transport seam
//!
//! The executor never talks to `reqwest` directly. It hands a [`CallRequest`]
//! to a [`Transport`] and classifies the [`TransportResponse`] it gets back.

use crate::error::{Error, Result};
use crate::http::response::render_response;
use crate::types::{JsonValue, Method, StringMap};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;

/// Extra arguments passed along with a call
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// JSON request body
    pub json: Option<JsonValue>,
    /// Request headers
    pub headers: StringMap,
}

impl CallOptions {
    /// Create empty call options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.json = Some(body);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// One physical request
#[derive(Clone)]
pub struct CallRequest {
    pub method: Method,
    pub url: String,
    /// Sent as the basic-auth username with an empty password
    pub api_key: String,
    pub timeout: Duration,
    pub options: CallOptions,
}

impl std::fmt::Debug for CallRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("options", &self.options)
            .finish()
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct TransportResponse {
    status: u16,
    reason: Option<String>,
    body: Bytes,
    error_flagged: bool,
}

impl TransportResponse {
    /// Create a response; 4xx and 5xx are flagged as errors
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            reason: None,
            body: body.into(),
            error_flagged: (400..600).contains(&status),
        }
    }

    /// Create a response with a JSON body
    pub fn json_body(status: u16, body: &JsonValue) -> Self {
        Self::new(status, body.to_string())
    }

    /// Set the reason phrase
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Override whether the status check reports an error
    ///
    /// Servers have been seen answering 429 without the client library
    /// treating it as a failure.
    #[must_use]
    pub fn with_error_flag(mut self, flagged: bool) -> Self {
        self.error_flagged = flagged;
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decode the body as JSON
    pub fn json(&self) -> std::result::Result<JsonValue, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Fail if the transport flagged this status as an error
    pub fn error_for_status(&self) -> Result<()> {
        if self.error_flagged {
            Err(Error::http_status(self.status, render_response(self)))
        } else {
            Ok(())
        }
    }
}

/// Failure to get any response at all
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request exceeded its timeout
    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },

    /// Anything else; surfaced to the caller unchanged
    #[error(transparent)]
    Other(#[from] Error),
}

/// Sends requests on behalf of the executor
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return whatever status the server answered with
    async fn send(&self, request: CallRequest) -> std::result::Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the default user agent
    pub fn new() -> Result<Self> {
        Self::with_user_agent(format!("paced-api/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Create a transport with a custom user agent
    pub fn with_user_agent(user_agent: impl AsRef<str>) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent.as_ref()).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: CallRequest) -> std::result::Result<TransportResponse, TransportError> {
        let timeout = request.timeout;
        let mut req = self
            .client
            .request(request.method.into(), &request.url)
            .basic_auth(&request.api_key, Some(""))
            .timeout(timeout);

        for (key, value) in &request.options.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(ref body) = request.options.json {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| classify(e, timeout))?;
        let status = response.status();
        let flagged = response.error_for_status_ref().is_err();
        let body = response.bytes().await.map_err(|e| classify(e, timeout))?;

        let mut out = TransportResponse::new(status.as_u16(), body).with_error_flag(flagged);
        if let Some(reason) = status.canonical_reason() {
            out = out.with_reason(reason);
        }
        Ok(out)
    }
}

fn classify(e: reqwest::Error, timeout: Duration) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout { after: timeout }
    } else {
        TransportError::Other(Error::Http(e))
    }
}
