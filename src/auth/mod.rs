//! Authentication module
//!
//! Supports: Basic, Bearer
//!
//! The control plane authenticates every round-trip, so the `Authenticator`
//! is applied to each page request rather than once per listing.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;

#[cfg(test)]
mod tests;
