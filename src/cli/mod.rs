//! CLI module
//!
//! Command-line interface for querying a control plane.
//!
//! # Commands
//!
//! - `list` - Fetch every record of one or more iterator operations
//! - `count` - Print the total record count of an iterator operation
//! - `exists` - Check whether an iterator operation matches any record
//! - `validate` - Check a client config file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
