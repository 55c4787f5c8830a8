//! # storagelist
//!
//! A client for storage-array control planes whose "list" operations are
//! server-side paginated.
//!
//! A single logical listing (LUNs, volumes, QoS policy groups, network
//! interfaces, ...) may take several round-trips, each returning a page of
//! records and an opaque continuation token. This crate merges those pages
//! into one complete result, or fails as a whole.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storagelist::{ArrayClient, Arguments, ClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::from_file("cluster.yaml")?;
//!     let client = ArrayClient::new(&config)?;
//!
//!     let luns = client.list("lun-get-iter", &Arguments::new()).await?;
//!     println!("{} LUNs", luns.num_records);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │ ArrayClient::list(operation, arguments)            │
//! └─────────────────────────┬──────────────────────────┘
//!                           │
//! ┌─────────────────────────┴──────────────────────────┐
//! │ IterMerger  (loop while next-tag present)          │
//! └─────────────────────────┬──────────────────────────┘
//!                           │ PageFetcher::fetch_page
//! ┌──────────┬──────────────┴──────┬───────────────────┐
//! │   Auth   │       HTTP          │      Decode       │
//! ├──────────┼─────────────────────┼───────────────────┤
//! │ Basic    │ Retry / Backoff     │ PageLayout paths  │
//! │ Bearer   │ Rate Limit          │ API status        │
//! └──────────┴─────────────────────┴───────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Paginated listing merge
pub mod pagination;

/// Reply decoding
pub mod decode;

/// Client configuration
pub mod config;

/// Control plane client
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::ArrayClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use pagination::{fetch_all, IterMerger, ListOptions, ListResult, Page, PageFetcher};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
