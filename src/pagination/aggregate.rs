//! Walking every page
//!
//! Pages are fetched strictly one after another until the server stops
//! sending a cursor. There is no page limit.

use super::getter::PagedResponseGetter;
use crate::error::{Error, Result};
use crate::http::{CallExecutor, Transport};
use crate::query::merge_query_params;
use crate::types::{JsonObject, JsonValue};
use tracing::info;

/// Collects all pages of a collection
pub struct ResponseAggregator<'a, T> {
    executor: &'a CallExecutor<T>,
    template: PagedResponseGetter,
}

impl<'a, T: Transport> ResponseAggregator<'a, T> {
    /// Create an aggregator; `template` supplies the credential and cursor names
    pub fn new(executor: &'a CallExecutor<T>, template: PagedResponseGetter) -> Self {
        Self { executor, template }
    }

    /// Fetch every page starting at `url`
    pub async fn get_responses(&self, url: &str) -> Result<Vec<JsonObject>> {
        self.collect(url.to_string()).await
    }

    /// Fetch every page starting at `url` with `params` merged into its query
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKeys`] before any request if `params` clash with the
    /// URL's query; otherwise the first terminal error of any page.
    pub async fn get_responses_with_params<I, K, V>(
        &self,
        url: &str,
        params: I,
    ) -> Result<Vec<JsonObject>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let base_url = merge_query_params(url, params)?;
        self.collect(base_url).await
    }

    async fn collect(&self, base_url: String) -> Result<Vec<JsonObject>> {
        let mut pages = Vec::new();
        let mut page_url = base_url.clone();

        loop {
            let mut getter = self.template.for_page(page_url.as_str());
            let page = getter.call_api(self.executor).await?;
            pages.push(page.body);
            info!("Fetched page {} from {}", pages.len(), page_url);

            match page.cursor {
                Some(cursor) => page_url = getter.next_page_url(&base_url, &cursor),
                None => break,
            }
        }

        Ok(pages)
    }
}

/// Fetch every page starting at `url`, using `template` for each page
pub async fn get_responses<T: Transport>(
    executor: &CallExecutor<T>,
    url: &str,
    template: &PagedResponseGetter,
) -> Result<Vec<JsonObject>> {
    ResponseAggregator::new(executor, template.clone())
        .get_responses(url)
        .await
}

/// Concatenate the array under `field` from every page, in page order
///
/// # Errors
///
/// [`Error::MissingField`] if a page lacks the field and
/// [`Error::InvalidField`] if it is not an array. Page numbers are 1-based.
pub fn concat_response_pages(pages: &[JsonObject], field: &str) -> Result<Vec<JsonValue>> {
    let mut out = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        match page.get(field) {
            Some(JsonValue::Array(items)) => out.extend(items.iter().cloned()),
            Some(_) => {
                return Err(Error::InvalidField {
                    field: field.to_string(),
                    page: index + 1,
                })
            }
            None => return Err(Error::missing_field(field, index + 1)),
        }
    }
    Ok(out)
}
