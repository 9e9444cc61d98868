//! Pagination module
//!
//! Cursor pagination on top of the paced executor.
//!
//! # Overview
//!
//! Each response carries a cursor field (`nextPageToken` by default). While
//! it is present, the next page is requested from the first page's URL with
//! the cursor appended as a query parameter (`pageToken` by default).

mod aggregate;
mod getter;

pub use aggregate::{concat_response_pages, get_responses, ResponseAggregator};
pub use getter::{extract_cursor, Page, PageConfig, PagedResponseGetter};
