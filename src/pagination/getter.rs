//! Single-page fetching
//!
//! A [`PagedResponseGetter`] GETs one page and pulls the continuation cursor
//! out of the body. The caller decides whether to ask for the next page.

use crate::error::Result;
use crate::http::{ApiCaller, CallExecutor, Credential, Transport};
use crate::query::{append_query_param, merge_query_params};
use crate::types::{JsonObject, JsonValue, Method};
use tracing::debug;

/// Where the cursor lives in responses and how it goes back into requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    /// Body field holding the next cursor (e.g. "nextPageToken")
    pub cursor_field: String,
    /// Query parameter carrying the cursor on the next request (e.g. "pageToken")
    pub cursor_param: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            cursor_field: "nextPageToken".to_string(),
            cursor_param: "pageToken".to_string(),
        }
    }
}

impl PageConfig {
    /// Create a page config
    pub fn new(cursor_field: impl Into<String>, cursor_param: impl Into<String>) -> Self {
        Self {
            cursor_field: cursor_field.into(),
            cursor_param: cursor_param.into(),
        }
    }
}

/// One fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Parsed response body
    pub body: JsonObject,
    /// Cursor for the next page, `None` when this was the last one
    pub cursor: Option<String>,
}

impl Page {
    /// Check if more pages follow
    pub fn has_next(&self) -> bool {
        self.cursor.is_some()
    }
}

/// GET caller for one page of a cursor-paginated collection
#[derive(Debug, Clone)]
pub struct PagedResponseGetter {
    page_url: String,
    credential: Credential,
    config: PageConfig,
    next_page_cursor: Option<String>,
}

impl PagedResponseGetter {
    /// Create a getter with the default cursor names
    pub fn new(page_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            page_url: page_url.into(),
            credential,
            config: PageConfig::default(),
            next_page_cursor: None,
        }
    }

    /// Create a getter for `page_url` with `params` merged into its query
    pub fn with_params<I, K, V>(page_url: &str, params: I, credential: Credential) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        Ok(Self::new(merge_query_params(page_url, params)?, credential))
    }

    /// Use different cursor names
    #[must_use]
    pub fn with_config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    /// Same credential and cursor names, different page
    #[must_use]
    pub fn for_page(&self, page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            credential: self.credential.clone(),
            config: self.config.clone(),
            next_page_cursor: None,
        }
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Cursor from the last successful [`call_api`](Self::call_api)
    pub fn next_page_cursor(&self) -> Option<&str> {
        self.next_page_cursor.as_deref()
    }

    /// Fetch this page
    ///
    /// Retries for rate limiting and timeouts happen inside the executor and
    /// always repeat this getter's URL.
    pub async fn call_api<T: Transport>(&mut self, executor: &CallExecutor<T>) -> Result<Page> {
        let body = executor.call_api(&*self).await?;
        let cursor = extract_cursor(&body, &self.config.cursor_field);
        debug!(
            "Page {} next cursor: {}",
            self.page_url,
            cursor.as_deref().unwrap_or("<none>")
        );
        self.next_page_cursor.clone_from(&cursor);
        Ok(Page { body, cursor })
    }

    /// URL of the page after `base_url` for a cursor
    ///
    /// Appends to `base_url` as given, so pass the first page's URL rather
    /// than a URL that already carries a cursor.
    pub fn next_page_url(&self, base_url: &str, cursor: &str) -> String {
        append_query_param(base_url, &self.config.cursor_param, cursor)
    }
}

impl ApiCaller for PagedResponseGetter {
    fn method(&self) -> Method {
        Method::GET
    }

    fn url(&self) -> &str {
        &self.page_url
    }

    fn api_key(&self) -> Result<String> {
        self.credential.resolve()
    }
}

/// Read the cursor field
///
/// Missing, `null`, `false` and `""` all mean there is no next page. Numbers
/// are used as their JSON text.
pub fn extract_cursor(body: &JsonObject, field: &str) -> Option<String> {
    match body.get(field)? {
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Null | JsonValue::Bool(false) => None,
        other => {
            debug!("Ignoring cursor field '{}' of unsupported shape: {}", field, other);
            None
        }
    }
}
