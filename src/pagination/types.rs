//! Pagination types and traits
//!
//! Defines the page, request and result shapes shared by the merge engine
//! and every page fetcher.

use crate::error::{Error, Result};
use crate::types::{Arguments, JsonValue};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Round-trip bound applied to a single listing unless overridden
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Reserved argument carrying the page size
pub const LIMIT_FIELD: &str = "max-records";

/// Reserved argument carrying the continuation token
pub const CONTINUATION_FIELD: &str = "tag";

// ============================================================================
// Page
// ============================================================================

/// One round-trip's worth of a paginated listing.
///
/// Fields are kept as close to the wire as possible: the record count is the
/// raw declared value and the item container may be missing entirely. The
/// merge engine decides what is malformed.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Declared record count, unparsed
    pub num_records: Option<String>,
    /// Item container, `None` when the reply carried none
    pub items: Option<Vec<T>>,
    /// Opaque continuation token
    pub next_tag: Option<String>,
}

impl<T> Page<T> {
    /// Create a page declaring `num_records` with the given items
    pub fn new(num_records: u64, items: Vec<T>) -> Self {
        Self {
            num_records: Some(num_records.to_string()),
            items: Some(items),
            next_tag: None,
        }
    }

    /// Create a final page whose declared count matches its items
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items.len() as u64, items)
    }

    /// Create an empty final page
    pub fn empty() -> Self {
        Self::new(0, Vec::new())
    }

    /// Set the continuation token
    #[must_use]
    pub fn with_next_tag(mut self, tag: impl Into<String>) -> Self {
        self.next_tag = Some(tag.into());
        self
    }

    /// Continuation token, with an empty token treated as absent
    pub fn next_tag(&self) -> Option<&str> {
        self.next_tag.as_deref().filter(|tag| !tag.is_empty())
    }

    /// Check whether another page follows this one
    pub fn has_more(&self) -> bool {
        self.next_tag().is_some()
    }

    /// Parse the declared record count
    pub fn record_count(&self) -> std::result::Result<u64, String> {
        let raw = self
            .num_records
            .as_deref()
            .ok_or_else(|| "missing record count".to_string())?;
        raw.trim()
            .parse::<u64>()
            .map_err(|_| format!("invalid record count '{raw}'"))
    }
}

// ============================================================================
// List Result
// ============================================================================

/// Fully merged answer of a paginated listing.
///
/// Carries no continuation token: a finished result looks like a reply the
/// control plane could have produced in one unpaged round-trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResult<T> {
    /// Sum of the record counts declared by every page
    #[serde(rename = "num-records")]
    pub num_records: u64,
    /// Items of every page, in fetch order
    #[serde(rename = "attributes-list")]
    pub records: Vec<T>,
}

impl<T> ListResult<T> {
    /// Create a list result
    pub fn new(num_records: u64, records: Vec<T>) -> Self {
        Self {
            num_records,
            records,
        }
    }

    /// Number of items actually received
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether no items were received
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check whether the control plane declared any records
    pub fn has_records(&self) -> bool {
        self.num_records > 0
    }

    /// Iterate over the items
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Take the items
    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    /// View the result as a single final page
    pub fn into_page(self) -> Page<T> {
        Page::new(self.num_records, self.records)
    }
}

impl<T> IntoIterator for ListResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

// ============================================================================
// List Request
// ============================================================================

/// A validated listing request.
///
/// Immutable once built: every page of the listing is issued from these
/// same arguments, with only the continuation token added per page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    operation: String,
    arguments: Arguments,
    page_size: u32,
}

impl ListRequest {
    /// Validate the inputs and inject the page size under [`LIMIT_FIELD`]
    pub fn new(
        operation: impl Into<String>,
        arguments: &Arguments,
        page_size: u32,
    ) -> Result<Self> {
        let operation = operation.into();
        if operation.trim().is_empty() {
            return Err(Error::invalid_request("operation name is empty"));
        }
        if page_size == 0 {
            return Err(Error::invalid_request("page size must be positive"));
        }
        if arguments.contains_key(CONTINUATION_FIELD) {
            return Err(Error::invalid_request(format!(
                "argument '{CONTINUATION_FIELD}' is reserved for continuation"
            )));
        }

        let mut arguments = arguments.clone();
        arguments.insert(LIMIT_FIELD.to_string(), JsonValue::from(page_size));

        Ok(Self {
            operation,
            arguments,
            page_size,
        })
    }

    /// Operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Arguments, including the injected page size
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Page size
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// Build the arguments of one page from a listing's arguments and the
/// current continuation token. The input is never modified.
pub fn page_arguments(arguments: &Arguments, continuation: Option<&str>) -> Arguments {
    let mut page_args = arguments.clone();
    if let Some(tag) = continuation {
        page_args.insert(CONTINUATION_FIELD.to_string(), JsonValue::from(tag));
    }
    page_args
}

// ============================================================================
// List Options
// ============================================================================

/// Tuning for a single listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Records requested per round-trip
    pub page_size: u32,
    /// Maximum round-trips, `None` for unbounded
    pub max_pages: Option<usize>,
    /// Deadline for the whole listing, applied to every round-trip
    pub timeout: Option<Duration>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: Some(DEFAULT_MAX_PAGES),
            timeout: None,
        }
    }
}

impl ListOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the round-trip bound
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Remove the round-trip bound
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.max_pages = None;
        self
    }

    /// Set the overall deadline
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// ============================================================================
// Page Fetcher
// ============================================================================

/// Performs one round-trip of a paginated listing.
///
/// Implementations own transport, authentication and the wire format. They
/// must forward `continuation` as-is under [`CONTINUATION_FIELD`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Record type carried by pages
    type Record: Send;

    /// Fetch one page
    async fn fetch_page(
        &self,
        operation: &str,
        arguments: &Arguments,
        continuation: Option<&str>,
    ) -> Result<Page<Self::Record>>;
}
