//! Message writers
//!
//! A writer serializes and flushes one message at a time. Each call is one
//! synchronous write plus flush, so a consumer reading incrementally always
//! sees a complete, parseable unit per call.

use super::Message;
use crate::catalog::StreamSchema;
use crate::error::Result;
use crate::state::State;
use crate::types::{JsonValue, ReplicationMethod};
use chrono::{DateTime, Utc};
use std::io::Write;

/// The strictly-ordered output channel consumed by a downstream target
pub trait MessageWriter: Send {
    /// Serialize and flush one message
    fn write_message(&mut self, message: &Message) -> Result<()>;

    /// Write a SCHEMA message
    fn write_schema(
        &mut self,
        stream: &str,
        schema: &StreamSchema,
        key_properties: &[String],
        bookmark_properties: Option<&[String]>,
        replication_method: Option<ReplicationMethod>,
    ) -> Result<()> {
        self.write_message(&Message::Schema {
            stream: stream.to_string(),
            schema: schema.clone(),
            key_properties: key_properties.to_vec(),
            bookmark_properties: bookmark_properties.map(<[String]>::to_vec),
            replication_method,
        })
    }

    /// Write a RECORD message
    ///
    /// Stamped with `time_extracted` when given, otherwise with the time of
    /// the call.
    fn write_record(
        &mut self,
        stream: &str,
        record: JsonValue,
        time_extracted: Option<DateTime<Utc>>,
    ) -> Result<()> {
        self.write_message(&Message::Record {
            stream: stream.to_string(),
            record,
            time_extracted: time_extracted.or_else(|| Some(Utc::now())),
        })
    }

    /// Write a STATE message carrying the entire current state
    ///
    /// Repeated calls with the same state are harmless: replaying a state
    /// line has no effect beyond the I/O.
    fn write_state(&mut self, state: &State) -> Result<()> {
        self.write_message(&Message::State {
            value: state.clone(),
        })
    }

    /// Write an ACTIVATE_VERSION message
    fn write_activate_version(&mut self, stream: &str, version: i64) -> Result<()> {
        self.write_message(&Message::ActivateVersion {
            stream: stream.to_string(),
            version,
        })
    }
}

// ============================================================================
// JSON Lines Writer
// ============================================================================

/// Newline-delimited JSON writer over any `Write` sink
pub struct JsonLinesWriter<W: Write + Send> {
    sink: W,
}

impl<W: Write + Send> JsonLinesWriter<W> {
    /// Create a writer over the given sink
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Consume the writer, returning the sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl JsonLinesWriter<std::io::Stdout> {
    /// A writer over stdout, the conventional channel to a target process
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> MessageWriter for JsonLinesWriter<W> {
    fn write_message(&mut self, message: &Message) -> Result<()> {
        let line = serde_json::to_string(message)?;
        self.sink.write_all(line.as_bytes())?;
        self.sink.write_all(b"\n")?;
        // One flush per message keeps every line complete on crash
        self.sink.flush()?;
        Ok(())
    }
}

// ============================================================================
// Capture Writer
// ============================================================================

/// In-memory writer that records every message, for tests and inspection
#[derive(Debug, Default)]
pub struct CaptureWriter {
    messages: Vec<Message>,
}

impl CaptureWriter {
    /// Create an empty capture writer
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured messages, in emission order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Consume the writer, returning the captured messages
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

impl MessageWriter for CaptureWriter {
    fn write_message(&mut self, message: &Message) -> Result<()> {
        self.messages.push(message.clone());
        Ok(())
    }
}
