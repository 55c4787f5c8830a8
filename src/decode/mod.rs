//! Response decoder module
//!
//! Turns a control plane reply body into a [`Page`](crate::pagination::Page).
//!
//! # Overview
//!
//! Replies are JSON documents. A [`PageLayout`] names where the record count,
//! the item container, the continuation token and the call status live, so
//! the same decoder serves every listing operation.

mod decoders;
mod layout;

pub use decoders::{JsonPageDecoder, PageDecoder};
pub use layout::PageLayout;
