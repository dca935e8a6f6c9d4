//! Error types for replikit
//!
//! This module defines the error hierarchy for the entire toolkit.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for replikit
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Catalog Errors
    // ============================================================================
    #[error("Malformed catalog: {message}")]
    MalformedCatalog { message: String },

    #[error("Stream '{stream}' not found in catalog")]
    StreamNotFound { stream: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unsupported replication method '{method}' for stream '{stream}'")]
    UnsupportedReplicationMethod { stream: String, method: String },

    // ============================================================================
    // Record Validation Errors
    // ============================================================================
    #[error("Schema validation failed for stream '{stream}': {message}")]
    SchemaValidation { stream: String, message: String },

    // ============================================================================
    // Connector Errors
    // ============================================================================
    #[error("Connector error for stream '{stream}': {message}")]
    Connector { stream: String, message: String },

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    // ============================================================================
    // Serialization / I/O Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a malformed catalog error
    pub fn malformed_catalog(message: impl Into<String>) -> Self {
        Self::MalformedCatalog {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a schema validation error
    pub fn schema_validation(stream: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaValidation {
            stream: stream.into(),
            message: message.into(),
        }
    }

    /// Create a connector error
    pub fn connector(stream: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connector {
            stream: stream.into(),
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create a stream-not-found error
    pub fn stream_not_found(stream: impl Into<String>) -> Self {
        Self::StreamNotFound {
            stream: stream.into(),
        }
    }

    /// Check if this error is fatal before any sync starts
    ///
    /// Catalog and configuration errors abort before a SCHEMA message is
    /// emitted; everything else surfaces mid-run.
    pub fn is_pre_sync(&self) -> bool {
        matches!(
            self,
            Error::MalformedCatalog { .. }
                | Error::Config { .. }
                | Error::UnsupportedReplicationMethod { .. }
        )
    }
}

/// Result type alias for replikit
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
