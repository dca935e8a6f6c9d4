//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Replikit incremental replication CLI
#[derive(Parser, Debug)]
#[command(name = "replikit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source definition file (JSON, one JSONL file per stream)
    #[arg(short = 'S', long, global = true)]
    pub source: Option<PathBuf>,

    /// Catalog file (JSON)
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    /// State file (JSON)
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover streams from the source and emit a catalog
    Discover {
        /// Write the catalog to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Select a stream (and optionally columns) in a catalog file
    Select {
        /// Stream to select
        stream: String,

        /// Primary key fields (comma-separated)
        #[arg(long)]
        key_properties: Option<String>,

        /// Replication method (FULL_TABLE or INCREMENTAL)
        #[arg(long)]
        replication_method: Option<String>,

        /// Replication key field
        #[arg(long)]
        replication_key: Option<String>,

        /// Columns to select (comma-separated, empty = all)
        #[arg(long)]
        columns: Option<String>,

        /// Columns to deselect (comma-separated)
        #[arg(long)]
        deselect: Option<String>,
    },

    /// Sync selected streams, emitting messages to stdout
    Read {
        /// Records between state emissions on sorted streams
        #[arg(long, default_value = "1")]
        state_interval: usize,

        /// Skip records that fail schema validation instead of aborting
        #[arg(long)]
        skip_invalid_records: bool,
    },
}
