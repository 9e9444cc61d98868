//! Shared backoff state
//!
//! One [`CallerState`] exists per caller variant. Cloning the handle shares
//! the same underlying values, so every call made through any clone adjusts
//! the pacing seen by all the others.

use crate::config::BackoffConfig;
use crate::types::CallerVariant;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Handle to the wait/timeout values of one caller variant
///
/// Each adjustment is atomic on its own, but the executor's
/// read-wait, send, adjust sequence is not: concurrent calls on one variant
/// may interleave their adjustments.
#[derive(Clone)]
pub struct CallerState {
    variant: CallerVariant,
    inner: Arc<Mutex<BackoffConfig>>,
}

impl CallerState {
    /// Create state seeded from a config
    pub fn new(variant: CallerVariant, config: BackoffConfig) -> Self {
        Self {
            variant,
            inner: Arc::new(Mutex::new(config)),
        }
    }

    /// State with the read defaults
    pub fn read() -> Self {
        Self::new(CallerVariant::Read, BackoffConfig::read())
    }

    /// State with the write defaults
    pub fn write() -> Self {
        Self::new(CallerVariant::Write, BackoffConfig::write())
    }

    /// Which variant this state paces
    pub fn variant(&self) -> CallerVariant {
        self.variant
    }

    /// Copy of the current values
    pub fn snapshot(&self) -> BackoffConfig {
        *self.lock()
    }

    /// Current wait before each request, in seconds
    pub fn wait_seconds(&self) -> f64 {
        self.lock().wait_seconds
    }

    /// Current wait before each request
    pub fn wait(&self) -> Duration {
        to_duration(self.wait_seconds())
    }

    /// Current per-request timeout, in seconds
    pub fn timeout_seconds(&self) -> f64 {
        self.lock().timeout_seconds
    }

    /// Current per-request timeout
    pub fn timeout(&self) -> Duration {
        to_duration(self.timeout_seconds())
    }

    /// Multiply the wait by the increase scalar. No ceiling.
    ///
    /// Returns the new wait in seconds.
    pub fn increase_wait(&self) -> f64 {
        let mut state = self.lock();
        state.wait_seconds *= state.increase_scalar;
        state.wait_seconds
    }

    /// Multiply the timeout by the increase scalar. No ceiling.
    ///
    /// Returns the new timeout in seconds.
    pub fn increase_timeout(&self) -> f64 {
        let mut state = self.lock();
        state.timeout_seconds *= state.increase_scalar;
        state.timeout_seconds
    }

    /// Multiply the wait by the decrease scalar, floored at the minimum wait
    ///
    /// Returns the new wait in seconds.
    pub fn decrease_wait(&self) -> f64 {
        let mut state = self.lock();
        state.wait_seconds = (state.wait_seconds * state.decrease_scalar).max(state.min_wait_seconds);
        state.wait_seconds
    }

    fn lock(&self) -> MutexGuard<'_, BackoffConfig> {
        // Values stay consistent even if a holder panicked: every write is a single assignment.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Seconds past what `Duration` can hold saturate to `Duration::MAX`
fn to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}

impl std::fmt::Debug for CallerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.snapshot();
        f.debug_struct("CallerState")
            .field("variant", &self.variant)
            .field("wait_seconds", &state.wait_seconds)
            .field("timeout_seconds", &state.timeout_seconds)
            .finish_non_exhaustive()
    }
}
