//! Caller capability
//!
//! An [`ApiCaller`] says what to call: the method, the URL and the API key.
//! How the call is paced and retried is the executor's job.

use crate::error::{Error, Result};
use crate::http::transport::CallOptions;
use crate::types::{CallerVariant, JsonValue, Method};

/// Something the executor can call
pub trait ApiCaller: Send + Sync {
    /// HTTP method to use
    fn method(&self) -> Method;

    /// Target URL
    fn url(&self) -> &str;

    /// API key, sent as the basic-auth username
    fn api_key(&self) -> Result<String>;

    /// Extra arguments for the request
    fn call_options(&self) -> CallOptions {
        CallOptions::default()
    }

    /// Backoff variant to pace against
    fn variant(&self) -> CallerVariant {
        self.method().variant()
    }
}

/// Where an API key comes from
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// A key held in memory
    Static(String),
    /// A key read from an environment variable on every call
    Env(String),
}

impl Credential {
    /// Create a static credential
    pub fn key(key: impl Into<String>) -> Self {
        Self::Static(key.into())
    }

    /// Create an environment variable credential
    pub fn env(var: impl Into<String>) -> Self {
        Self::Env(var.into())
    }

    /// Produce the key
    pub fn resolve(&self) -> Result<String> {
        match self {
            Credential::Static(key) => Ok(key.clone()),
            Credential::Env(var) => match std::env::var(var) {
                Ok(key) if !key.trim().is_empty() => Ok(key),
                Ok(_) => Err(Error::credential(format!(
                    "environment variable {var} is set but empty"
                ))),
                Err(_) => Err(Error::credential(format!(
                    "missing {var} environment variable"
                ))),
            },
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Static(_) => f.debug_tuple("Static").field(&"<redacted>").finish(),
            Credential::Env(var) => f.debug_tuple("Env").field(var).finish(),
        }
    }
}

/// A single endpoint call
#[derive(Debug, Clone)]
pub struct Endpoint {
    method: Method,
    url: String,
    credential: Credential,
    options: CallOptions,
}

impl Endpoint {
    /// Create an endpoint call
    pub fn new(method: Method, url: impl Into<String>, credential: Credential) -> Self {
        Self {
            method,
            url: url.into(),
            credential,
            options: CallOptions::default(),
        }
    }

    /// Read call
    pub fn get(url: impl Into<String>, credential: Credential) -> Self {
        Self::new(Method::GET, url, credential)
    }

    /// Write call
    pub fn post(url: impl Into<String>, credential: Credential) -> Self {
        Self::new(Method::POST, url, credential)
    }

    /// Write call
    pub fn delete(url: impl Into<String>, credential: Credential) -> Self {
        Self::new(Method::DELETE, url, credential)
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.options = self.options.json(body);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options = self.options.header(key, value);
        self
    }
}

impl ApiCaller for Endpoint {
    fn method(&self) -> Method {
        self.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn api_key(&self) -> Result<String> {
        self.credential.resolve()
    }

    fn call_options(&self) -> CallOptions {
        self.options.clone()
    }
}
