//! CLI module
//!
//! Command-line interface for driving replication.
//!
//! # Commands
//!
//! - `discover` - Build a catalog from a source definition
//! - `select` - Mark streams and columns for replication in a catalog
//! - `read` - Sync selected streams, emitting messages to stdout

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
