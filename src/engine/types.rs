//! Engine configuration and statistics

use crate::types::InvalidRecordPolicy;

/// Configuration for a sync run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Records between STATE emissions on sorted streams (1 = after every
    /// record, matching the bookmark-per-record advancement policy)
    pub state_interval: usize,

    /// What to do with records that fail schema validation
    pub on_invalid_record: InvalidRecordPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            state_interval: 1,
            on_invalid_record: InvalidRecordPolicy::Abort,
        }
    }
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the state emission interval (clamped to at least 1)
    #[must_use]
    pub fn with_state_interval(mut self, interval: usize) -> Self {
        self.state_interval = interval.max(1);
        self
    }

    /// Set the invalid record policy
    #[must_use]
    pub fn with_invalid_record_policy(mut self, policy: InvalidRecordPolicy) -> Self {
        self.on_invalid_record = policy;
        self
    }
}

/// Statistics from a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Records emitted
    pub records_synced: usize,
    /// Records dropped by the skip policy
    pub records_skipped: usize,
    /// Streams fully synced
    pub streams_synced: usize,
    /// STATE messages written
    pub state_writes: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an emitted record
    pub fn add_record(&mut self) {
        self.records_synced += 1;
    }

    /// Count a skipped record
    pub fn add_skipped(&mut self) {
        self.records_skipped += 1;
    }

    /// Count a completed stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Count a STATE write
    pub fn add_state_write(&mut self) {
        self.state_writes += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
