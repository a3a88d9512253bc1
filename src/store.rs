//! Collaborator seams.
//!
//! The sync core never talks to SQLite directly. It sees the event store,
//! the contact store, the preferences and the wall clock through these
//! traits; `crate::database` provides the SQLite implementations.

use crate::error::AppResult;
use crate::models::{
    AccountScope, CalendarSpec, Operation, OperationResult, Settings, SourceEvent,
};
use async_trait::async_trait;
use chrono::Datelike;
use futures::stream::BoxStream;

/// Calendar/event store, already scoped to one (account name, account type)
/// pair. Implementations must never touch rows outside that scope.
#[async_trait]
pub trait EventStore: Send + Sync {
    fn scope(&self) -> &AccountScope;

    /// Id of the calendar owned by the scope, if one exists.
    async fn find_calendar(&self) -> AppResult<Option<i64>>;

    async fn insert_calendar(&self, spec: &CalendarSpec) -> AppResult<i64>;

    async fn update_calendar_color(&self, calendar_id: i64, color: i64) -> AppResult<()>;

    async fn event_ids(&self, calendar_id: i64) -> AppResult<Vec<i64>>;

    async fn reminder_ids(&self, event_id: i64) -> AppResult<Vec<i64>>;

    /// Delete every event of the calendar together with its reminders.
    /// Returns the number of events removed.
    async fn delete_events(&self, calendar_id: i64) -> AppResult<u64>;

    /// Apply all operations or none. Reminder inserts may point at an
    /// earlier event insert of the same slice by position.
    async fn apply_batch(&self, operations: &[Operation]) -> AppResult<Vec<OperationResult>>;
}

/// Read-only contact store.
pub trait ContactSource: Send + Sync {
    /// Every contact row that has a dated event attached. The stream owns
    /// the underlying cursor; dropping it releases the cursor.
    fn source_events(&self) -> BoxStream<'_, AppResult<SourceEvent>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceSource: Send + Sync {
    async fn settings(&self) -> AppResult<Settings>;

    async fn set_reminder(&self, slot: usize, minutes: Option<u32>) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        chrono::Local::now().year()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_plausible() {
        let year = SystemClock.current_year();
        assert!(year >= 2024);
    }

    #[test]
    fn test_mock_clock() {
        let mut clock = MockClock::new();
        clock.expect_current_year().return_const(2024);
        assert_eq!(clock.current_year(), 2024);
    }
}
