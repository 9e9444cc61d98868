//! Configuration for caller pacing
//!
//! Backoff settings per variant, loadable from YAML, plus the built-in
//! defaults every caller starts from.

use crate::error::{Error, Result, ResultExt};
use crate::types::CallerVariant;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// Defaults
// ============================================================================

/// Default pacing values, in seconds and multiplicative scalars
pub struct RateLimits;

impl RateLimits {
    pub const READ_SECONDS: f64 = 1.0 / 10.0;
    pub const READ_TIMEOUT_SECONDS: f64 = 10.0;
    pub const WRITE_SECONDS: f64 = 1.0 / 5.0;
    pub const WRITE_TIMEOUT_SECONDS: f64 = 10.0;
    pub const WAIT_INCREASE_SCALAR: f64 = 2.0;
    pub const WAIT_DECREASE_SCALAR: f64 = 0.6;
}

// ============================================================================
// Backoff Config
// ============================================================================

/// Starting values and adjustment scalars for one caller variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackoffConfig {
    /// Initial wait before each request
    pub wait_seconds: f64,
    /// Floor the wait never decreases below
    pub min_wait_seconds: f64,
    /// Initial per-request timeout
    pub timeout_seconds: f64,
    /// Multiplier applied to wait on 429 and to timeout on timeouts
    #[serde(default = "default_increase")]
    pub increase_scalar: f64,
    /// Multiplier applied to wait after a successful call
    #[serde(default = "default_decrease")]
    pub decrease_scalar: f64,
}

fn default_increase() -> f64 {
    RateLimits::WAIT_INCREASE_SCALAR
}

fn default_decrease() -> f64 {
    RateLimits::WAIT_DECREASE_SCALAR
}

impl BackoffConfig {
    /// Defaults for read callers
    pub fn read() -> Self {
        Self {
            wait_seconds: RateLimits::READ_SECONDS,
            min_wait_seconds: RateLimits::READ_SECONDS,
            timeout_seconds: RateLimits::READ_TIMEOUT_SECONDS,
            increase_scalar: RateLimits::WAIT_INCREASE_SCALAR,
            decrease_scalar: RateLimits::WAIT_DECREASE_SCALAR,
        }
    }

    /// Defaults for write callers
    pub fn write() -> Self {
        Self {
            wait_seconds: RateLimits::WRITE_SECONDS,
            min_wait_seconds: RateLimits::WRITE_SECONDS,
            timeout_seconds: RateLimits::WRITE_TIMEOUT_SECONDS,
            increase_scalar: RateLimits::WAIT_INCREASE_SCALAR,
            decrease_scalar: RateLimits::WAIT_DECREASE_SCALAR,
        }
    }

    /// Defaults for a variant
    pub fn for_variant(variant: CallerVariant) -> Self {
        match variant {
            CallerVariant::Read => Self::read(),
            CallerVariant::Write => Self::write(),
        }
    }

    /// Create a new config builder seeded with the read defaults
    pub fn builder() -> BackoffConfigBuilder {
        BackoffConfigBuilder::default()
    }

    /// Check the values are usable
    pub fn validate(&self) -> Result<()> {
        if !(self.min_wait_seconds.is_finite() && self.min_wait_seconds >= 0.0) {
            return Err(Error::invalid_value(
                "min_wait_seconds",
                "must be a non-negative number",
            ));
        }
        if !(self.wait_seconds.is_finite() && self.wait_seconds >= self.min_wait_seconds) {
            return Err(Error::invalid_value(
                "wait_seconds",
                format!("must be at least min_wait_seconds ({})", self.min_wait_seconds),
            ));
        }
        if !(self.timeout_seconds.is_finite() && self.timeout_seconds > 0.0) {
            return Err(Error::invalid_value(
                "timeout_seconds",
                "must be a positive number",
            ));
        }
        if !(self.increase_scalar.is_finite() && self.increase_scalar >= 1.0) {
            return Err(Error::invalid_value("increase_scalar", "must be >= 1"));
        }
        if !(self.decrease_scalar > 0.0 && self.decrease_scalar <= 1.0) {
            return Err(Error::invalid_value(
                "decrease_scalar",
                "must be in the range (0, 1]",
            ));
        }
        Ok(())
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self::read()
    }
}

/// Builder for backoff config
#[derive(Default)]
pub struct BackoffConfigBuilder {
    config: BackoffConfig,
}

impl BackoffConfigBuilder {
    /// Set the initial wait
    pub fn wait_seconds(mut self, seconds: f64) -> Self {
        self.config.wait_seconds = seconds;
        self
    }

    /// Set the wait floor
    pub fn min_wait_seconds(mut self, seconds: f64) -> Self {
        self.config.min_wait_seconds = seconds;
        self
    }

    /// Set the initial timeout
    pub fn timeout_seconds(mut self, seconds: f64) -> Self {
        self.config.timeout_seconds = seconds;
        self
    }

    /// Set the increase scalar
    pub fn increase_scalar(mut self, scalar: f64) -> Self {
        self.config.increase_scalar = scalar;
        self
    }

    /// Set the decrease scalar
    pub fn decrease_scalar(mut self, scalar: f64) -> Self {
        self.config.decrease_scalar = scalar;
        self
    }

    /// Build and validate the config
    pub fn build(self) -> Result<BackoffConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ============================================================================
// Client Config
// ============================================================================

/// Top-level config: backoff per variant and transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Pacing for GET callers
    #[serde(default = "BackoffConfig::read")]
    pub read: BackoffConfig,

    /// Pacing for POST/DELETE callers
    #[serde(default = "BackoffConfig::write")]
    pub write: BackoffConfig,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("paced-api/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            read: BackoffConfig::read(),
            write: BackoffConfig::write(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Backoff config for a variant
    pub fn backoff(&self, variant: CallerVariant) -> BackoffConfig {
        match variant {
            CallerVariant::Read => self.read,
            CallerVariant::Write => self.write,
        }
    }

    /// Check both variants
    pub fn validate(&self) -> Result<()> {
        self.read
            .validate()
            .map_err(|e| Error::config(format!("read: {e}")))?;
        self.write
            .validate()
            .map_err(|e| Error::config(format!("write: {e}")))?;
        Ok(())
    }
}

/// Load a client config from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    load_config_from_str(&content)
}

/// Load a client config from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<ClientConfig> {
    let config: ClientConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}
