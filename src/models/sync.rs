// file: src/models/sync.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phases of one sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncState {
    Idle,
    Resolving,
    Purging,
    Generating,
    Flushing,
    Done,
    Failed,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Idle => "idle",
            SyncState::Resolving => "resolving",
            SyncState::Purging => "purging",
            SyncState::Generating => "generating",
            SyncState::Flushing => "flushing",
            SyncState::Done => "done",
            SyncState::Failed => "failed",
        }
    }
}

/// Outcome of a completed (possibly partial) sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub calendar_id: i64,
    pub state: SyncState,
    pub purged_events: u64,
    pub source_events: usize,
    pub unparseable: usize,
    pub projections: usize,
    pub events_queued: usize,
    pub reminders_queued: usize,
    pub flushes: usize,
    pub failed_flushes: usize,
    pub discarded_operations: usize,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SyncReport {
    pub fn new(calendar_id: i64) -> Self {
        Self {
            calendar_id,
            state: SyncState::Idle,
            purged_events: 0,
            source_events: 0,
            unparseable: 0,
            projections: 0,
            events_queued: 0,
            reminders_queued: 0,
            flushes: 0,
            failed_flushes: 0,
            discarded_operations: 0,
            cancelled: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// True when some queued operations never reached the store.
    pub fn is_partial(&self) -> bool {
        self.failed_flushes > 0 || self.discarded_operations > 0
    }

    pub fn finish(&mut self) {
        self.state = SyncState::Done;
        self.finished_at = Some(Utc::now());
    }
}
