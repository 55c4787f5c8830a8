//! Iterator merge engine
//!
//! Drives a [`PageFetcher`] through a token-continued listing and folds the
//! pages into one [`ListResult`]. Merging is all-or-nothing: any failure
//! drops the items gathered so far.

use super::types::{ListOptions, ListRequest, ListResult, Page, PageFetcher};
use crate::error::{Error, Result};
use crate::types::Arguments;
use tokio::time::Instant;
use tracing::{debug, info};

/// Merges a paginated listing into a single result
#[derive(Debug)]
pub struct IterMerger<'a, F: ?Sized> {
    fetcher: &'a F,
    options: ListOptions,
}

impl<'a, F> IterMerger<'a, F>
where
    F: PageFetcher + ?Sized,
{
    /// Create a merger with default options
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            options: ListOptions::default(),
        }
    }

    /// Set listing options
    #[must_use]
    pub fn with_options(mut self, options: ListOptions) -> Self {
        self.options = options;
        self
    }

    /// Options in effect
    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Fetch every page of `operation` and merge them
    pub async fn fetch_all(
        &self,
        operation: &str,
        arguments: &Arguments,
    ) -> Result<ListResult<F::Record>> {
        let request = ListRequest::new(operation, arguments, self.options.page_size)?;
        let deadline = self.options.timeout.map(|timeout| Instant::now() + timeout);

        let first = self.fetch(&request, None, 1, deadline).await?;
        let mut num_records = declared_count(&first, operation, 1)?;
        let has_more = first.has_more();
        let Page { items, next_tag, .. } = first;

        if !has_more {
            debug!(operation, num_records, "Single-page listing");
            return Ok(ListResult::new(num_records, items.unwrap_or_default()));
        }

        let Some(mut records) = items else {
            return Err(Error::malformed_page(
                operation,
                1,
                "continuation token present without an item container",
            ));
        };

        let mut next_tag = next_tag;
        let mut page = 1;

        while let Some(tag) = next_tag.take().filter(|tag| !tag.is_empty()) {
            page += 1;
            if let Some(max_pages) = self.options.max_pages {
                if page > max_pages {
                    return Err(Error::PageLimitExceeded {
                        operation: operation.to_string(),
                        max_pages,
                    });
                }
            }

            let current = self.fetch(&request, Some(&tag), page, deadline).await?;
            let count = declared_count(&current, operation, page)?;
            num_records = num_records
                .checked_add(count)
                .ok_or_else(|| Error::malformed_page(operation, page, "record count overflow"))?;

            let Page { items, next_tag: tag, .. } = current;
            if let Some(items) = items {
                records.extend(items);
            }
            next_tag = tag;
        }

        info!(
            operation,
            pages = page,
            num_records,
            items = records.len(),
            "Merged paginated listing"
        );

        Ok(ListResult::new(num_records, records))
    }

    /// Issue one round-trip, bounded by the listing deadline
    async fn fetch(
        &self,
        request: &ListRequest,
        continuation: Option<&str>,
        page: usize,
        deadline: Option<Instant>,
    ) -> Result<Page<F::Record>> {
        let call = self
            .fetcher
            .fetch_page(request.operation(), request.arguments(), continuation);

        let fetched = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, call)
                .await
                .map_err(|_| Error::Timeout {
                    timeout_ms: self
                        .options
                        .timeout
                        .map_or(0, |timeout| timeout.as_millis() as u64),
                })??,
            None => call.await?,
        };

        debug!(
            operation = request.operation(),
            page,
            num_records = fetched.num_records.as_deref().unwrap_or("<missing>"),
            has_more = fetched.has_more(),
            "Fetched page"
        );

        Ok(fetched)
    }
}

/// Fetch every page of `operation` with the given page size and default
/// bounds, merging them into one result
pub async fn fetch_all<F>(
    fetcher: &F,
    operation: &str,
    arguments: &Arguments,
    page_size: u32,
) -> Result<ListResult<F::Record>>
where
    F: PageFetcher + ?Sized,
{
    IterMerger::new(fetcher)
        .with_options(ListOptions::default().with_page_size(page_size))
        .fetch_all(operation, arguments)
        .await
}

fn declared_count<T>(page: &Page<T>, operation: &str, index: usize) -> Result<u64> {
    page.record_count()
        .map_err(|message| Error::malformed_page(operation, index, message))
}
