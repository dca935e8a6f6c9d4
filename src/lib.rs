// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Replikit
//!
//! A small, Rust-native toolkit for incremental data replication.
//! Sources declare streams in a catalog; the engine pulls records through a
//! pluggable loader and emits newline-delimited JSON messages (SCHEMA,
//! RECORD, STATE, ACTIVATE_VERSION) that a downstream target consumes.
//!
//! ## Features
//!
//! - **Catalog model**: discoverable streams with schemas, selection
//!   metadata, and replication configuration
//! - **Incremental sync**: bookmark tracking per stream, with sorted-stream
//!   checkpointing after every record and unsorted max-tracking
//! - **Crash-safe resumption**: the last emitted STATE is always a valid
//!   resume point, and an interrupted stream finishes first on restart
//! - **Schema evolution**: additive catalog merges that never drop columns
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use replikit::{Catalog, JsonlSource, ReplicationEngine, Result};
//! use replikit::messages::JsonLinesWriter;
//! use replikit::state::State;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = JsonlSource::from_file("source.json")?;
//!     let catalog = Catalog::discover(source.discover_schemas()?, &source);
//!
//!     let mut engine = ReplicationEngine::new(JsonLinesWriter::stdout(), State::new());
//!     engine.sync(&catalog, &source).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the toolkit
pub mod error;

/// Common types and type aliases
pub mod types;

/// Catalog model: streams, schemas, selection
pub mod catalog;

/// Metadata and selection resolver
pub mod metadata;

/// Bookmark state and persistence
pub mod state;

/// Replication engine
pub mod engine;

/// Message types and writers
pub mod messages;

/// Record validation against stream schemas
pub mod validate;

/// Source connector interface and built-in sources
pub mod source;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogEntry, StreamSchema};
pub use engine::{ReplicationEngine, SyncConfig, SyncStats};
pub use source::{JsonlSource, LoadRequest, StreamLoader};
pub use state::{State, StateManager};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
