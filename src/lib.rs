//! # paced-api
//!
//! Adaptive, rate-limit aware calling of JSON HTTP APIs, plus cursor
//! pagination built on top.
//!
//! ## Features
//!
//! - **Pacing**: every request waits a per-variant delay first (reads and
//!   writes are paced separately)
//! - **Adaptive backoff**: 429 doubles the wait, a timeout doubles the
//!   timeout, each successful call shrinks the wait back toward its floor
//! - **Cursor pagination**: follow `nextPageToken` until the server stops
//! - **Safe query merging**: duplicate query keys are an error, never an
//!   override
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paced_api::http::{CallExecutor, Credential};
//! use paced_api::pagination::{concat_response_pages, PagedResponseGetter, ResponseAggregator};
//!
//! # async fn run() -> paced_api::Result<()> {
//! let executor = CallExecutor::new()?;
//! let url = "https://api.example.com/v1/plans";
//! let template = PagedResponseGetter::new(url, Credential::env("MY_API_KEY"));
//!
//! let pages = ResponseAggregator::new(&executor, template)
//!     .get_responses_with_params(url, [("limit", "100")])
//!     .await?;
//! let plans = concat_response_pages(&pages, "plans")?;
//! # let _ = plans;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ResponseAggregator ──► PagedResponseGetter ──► CallExecutor ──► Transport
//!        │                                            │
//!   merge_query_params                          CallerState (read / write)
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pacing configuration
pub mod config;

/// Query string merging
pub mod query;

/// Paced HTTP calls with adaptive backoff
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Command-line interface
pub mod cli;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use http::{ApiCaller, CallExecutor, CallerState, Credential, Endpoint};
pub use pagination::{concat_response_pages, get_responses, PagedResponseGetter, ResponseAggregator};
pub use query::merge_query_params;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
