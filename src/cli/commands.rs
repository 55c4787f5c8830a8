//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storage-array control plane listing client
#[derive(Parser, Debug)]
#[command(name = "storagelist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Control plane endpoint, used when no config file is given
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Vserver to scope calls to (overrides the config file)
    #[arg(long, global = true)]
    pub vserver: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every record of iterator operations (repeat -o to run several
    /// concurrently)
    List {
        /// Iterator operation, e.g. lun-get-iter
        #[arg(short, long, required = true)]
        operation: Vec<String>,

        /// Call arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,

        /// Records per round-trip
        #[arg(long)]
        page_size: Option<u32>,

        /// Maximum round-trips per listing
        #[arg(long)]
        max_pages: Option<usize>,

        /// Deadline per listing in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Print the total record count of an iterator operation
    Count {
        /// Iterator operation
        #[arg(short, long)]
        operation: String,

        /// Call arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,
    },

    /// Check whether an iterator operation matches any record
    Exists {
        /// Iterator operation
        #[arg(short, long)]
        operation: String,

        /// Call arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,
    },

    /// Validate the client configuration
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}
