//! Pagination module
//!
//! Turns a token-continued, server-paginated listing into one complete
//! result.
//!
//! # Overview
//!
//! A [`PageFetcher`] performs single round-trips. The [`IterMerger`] calls it
//! repeatedly, forwarding the most recent continuation token, until a page
//! arrives without one:
//!
//! ```text
//! caller ──► IterMerger ──► PageFetcher ──► control plane
//!              ▲   │  (loop while next-tag present)
//!              └───┘
//! ```
//!
//! Items are concatenated in fetch order and declared record counts are
//! summed. A listing either completes or fails as a whole.

mod merge;
mod types;

pub use merge::{fetch_all, IterMerger};
pub use types::{
    page_arguments, ListOptions, ListRequest, ListResult, Page, PageFetcher, CONTINUATION_FIELD,
    DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, LIMIT_FIELD,
};
