//! Reminder offsets and the regenerate-all pass.
//!
//! A full sync folds reminder creation into event generation. When only the
//! reminder preferences change, [`ReminderPolicy::regenerate_all`] rewrites
//! the reminders of the existing events instead of rebuilding everything.

use crate::error::{AppError, AppResult};
use crate::models::{Operation, ReminderSpec, ReminderTarget, Settings, REMINDER_SLOTS};
use crate::store::EventStore;
use crate::sync::batch::{FlushOutcome, PendingBatch, FLUSH_THRESHOLD};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const JOB: &str = "Reminders";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    slots: [Option<u32>; REMINDER_SLOTS],
}

/// Counts from one regenerate-all pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderReport {
    pub calendar_id: i64,
    pub events: usize,
    pub deleted: usize,
    pub inserted: usize,
    pub flushes: usize,
    pub failed_flushes: usize,
    /// Set when a delete chunk was rejected and no reminders were added.
    pub inserts_skipped: bool,
}

impl ReminderPolicy {
    pub fn new(slots: [Option<u32>; REMINDER_SLOTS]) -> Self {
        Self { slots }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.reminder_minutes)
    }

    /// Same policy with one slot replaced. `None` disables the slot.
    pub fn with_override(mut self, slot: usize, minutes: Option<u32>) -> AppResult<Self> {
        let target = self.slots.get_mut(slot).ok_or_else(|| {
            AppError::invalid_input(format!(
                "reminder slot {} out of range (0..{})",
                slot, REMINDER_SLOTS
            ))
        })?;
        *target = minutes;
        Ok(self)
    }

    pub fn slots(&self) -> [Option<u32>; REMINDER_SLOTS] {
        self.slots
    }

    /// Offsets of the enabled slots, in slot order.
    pub fn enabled_minutes(&self) -> Vec<u32> {
        self.slots.iter().flatten().copied().collect()
    }

    /// Delete every reminder of every event in the calendar, then attach
    /// this policy's reminders to each remaining event. Chunks are applied
    /// best effort; enumeration errors abort the pass. A rejected delete
    /// chunk skips the insert phase, leaving the old reminders in place.
    pub async fn regenerate_all<S: EventStore + ?Sized>(
        &self,
        store: &S,
        calendar_id: i64,
    ) -> AppResult<ReminderReport> {
        let mut report = ReminderReport {
            calendar_id,
            ..ReminderReport::default()
        };
        let mut batch = PendingBatch::new(FLUSH_THRESHOLD);

        let event_ids = store.event_ids(calendar_id).await?;
        debug!("Clearing reminders of {} events", event_ids.len());
        for event_id in &event_ids {
            for reminder_id in store.reminder_ids(*event_id).await? {
                batch.push(Operation::DeleteReminder(reminder_id));
                report.deleted += 1;
                if batch.is_full() {
                    record(&mut report, batch.flush(store, JOB).await);
                }
            }
        }
        record(&mut report, batch.flush(store, JOB).await);

        let minutes = self.enabled_minutes();
        let event_ids = store.event_ids(calendar_id).await?;
        report.events = event_ids.len();
        if report.failed_flushes > 0 {
            warn!(
                "[{}] calendar {}: {} delete chunks failed, not adding new reminders",
                JOB, calendar_id, report.failed_flushes
            );
            report.inserts_skipped = true;
        } else if !minutes.is_empty() {
            for event_id in event_ids {
                if batch.would_overflow(minutes.len()) {
                    record(&mut report, batch.flush(store, JOB).await);
                }
                for m in &minutes {
                    batch.push(Operation::InsertReminder(ReminderSpec::alert(
                        *m,
                        ReminderTarget::Event(event_id),
                    )));
                }
                report.inserted += minutes.len();
                if batch.is_full() {
                    record(&mut report, batch.flush(store, JOB).await);
                }
            }
            record(&mut report, batch.flush(store, JOB).await);
        }

        info!(
            "[{}] calendar {}: {} reminders removed, {} queued for {} events ({} failed flushes)",
            JOB, calendar_id, report.deleted, report.inserted, report.events, report.failed_flushes
        );
        Ok(report)
    }
}

fn record(report: &mut ReminderReport, outcome: FlushOutcome) {
    match outcome {
        FlushOutcome::Empty => {}
        FlushOutcome::Applied(_) => report.flushes += 1,
        FlushOutcome::Failed(_) => {
            report.flushes += 1;
            report.failed_flushes += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalendarSpec, NewEvent};
    use crate::store::fake::FakeEventStore;
    use chrono::{Duration, TimeZone, Utc};

    async fn seed(store: &FakeEventStore, events: usize, reminders_each: &[u32]) -> i64 {
        let calendar_id = store
            .insert_calendar(&CalendarSpec::managed(store.scope(), "B", 0))
            .await
            .unwrap();
        let start = Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap();
        let mut batch = PendingBatch::new(1024);
        for i in 0..events {
            let event = NewEvent::all_day(
                calendar_id,
                format!("E{}", i),
                start,
                start + Duration::days(1),
                None,
            );
            batch.push_group(event, reminders_each);
        }
        store.apply_batch(&batch.take()).await.unwrap();
        store.state().batches.clear();
        calendar_id
    }

    #[test]
    fn test_enabled_minutes_skip_disabled_slots() {
        let policy = ReminderPolicy::new([Some(1440), None, Some(0)]);
        assert_eq!(policy.enabled_minutes(), vec![1440, 0]);
        assert!(ReminderPolicy::new([None; 3]).enabled_minutes().is_empty());
    }

    #[test]
    fn test_from_settings_and_override() {
        let policy = ReminderPolicy::from_settings(&Settings::default());
        assert_eq!(policy.slots(), [Some(1440), None, None]);

        let policy = policy.with_override(2, Some(60)).unwrap();
        assert_eq!(policy.enabled_minutes(), vec![1440, 60]);

        let policy = policy.with_override(0, None).unwrap();
        assert_eq!(policy.enabled_minutes(), vec![60]);

        assert!(matches!(
            policy.with_override(3, Some(1)),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_regenerate_replaces_reminders() {
        let store = FakeEventStore::new();
        let calendar_id = seed(&store, 3, &[1440, 30]).await;

        let policy = ReminderPolicy::new([Some(60), None, None]);
        let report = policy.regenerate_all(&store, calendar_id).await.unwrap();

        assert_eq!(report.events, 3);
        assert_eq!(report.deleted, 6);
        assert_eq!(report.inserted, 3);
        assert_eq!(report.flushes, 2);
        assert_eq!(report.failed_flushes, 0);

        let state = store.state();
        assert_eq!(state.reminders.len(), 3);
        assert!(state.reminders.iter().all(|(_, _, m)| *m == 60));
        let mut owners: Vec<i64> = state.reminders.iter().map(|(_, e, _)| *e).collect();
        owners.sort();
        owners.dedup();
        assert_eq!(owners.len(), 3);
    }

    #[tokio::test]
    async fn test_all_slots_disabled_only_deletes() {
        let store = FakeEventStore::new();
        let calendar_id = seed(&store, 2, &[1440]).await;

        let report = ReminderPolicy::new([None; 3])
            .regenerate_all(&store, calendar_id)
            .await
            .unwrap();

        assert_eq!(report.deleted, 2);
        assert_eq!(report.inserted, 0);
        assert!(store.state().reminders.is_empty());
    }

    #[tokio::test]
    async fn test_chunks_stay_under_threshold() {
        let store = FakeEventStore::new();
        let calendar_id = seed(&store, 150, &[10, 20]).await;

        let report = ReminderPolicy::new([Some(1), Some(2), Some(3)])
            .regenerate_all(&store, calendar_id)
            .await
            .unwrap();

        // 300 deletes, then 450 inserts in groups of three
        assert_eq!(report.deleted, 300);
        assert_eq!(report.inserted, 450);
        assert_eq!(report.failed_flushes, 0);
        let state = store.state();
        assert!(state.batches.iter().all(|b| b.len() <= FLUSH_THRESHOLD));
        assert_eq!(state.batches.len(), 2 + 3);
        assert_eq!(state.reminders.len(), 450);
        assert!(state.batches[0]
            .iter()
            .all(|op| matches!(op, Operation::DeleteReminder(_))));
    }

    #[tokio::test]
    async fn test_failed_delete_chunk_skips_inserts() {
        let store = FakeEventStore::new();
        let calendar_id = seed(&store, 3, &[1440]).await;
        store.state().failing_batches = vec![0];

        let report = ReminderPolicy::new([Some(60), Some(10), None])
            .regenerate_all(&store, calendar_id)
            .await
            .unwrap();

        assert!(report.inserts_skipped);
        assert_eq!(report.events, 3);
        assert_eq!(report.deleted, 3);
        assert_eq!(report.inserted, 0);
        assert_eq!(report.flushes, 1);
        assert_eq!(report.failed_flushes, 1);
        // the old reminders survive, and nothing was doubled up
        let state = store.state();
        assert_eq!(state.reminders.len(), 3);
        assert!(state.reminders.iter().all(|(_, _, m)| *m == 1440));
    }

    #[tokio::test]
    async fn test_failed_chunk_is_best_effort() {
        let store = FakeEventStore::new();
        let calendar_id = seed(&store, 2, &[]).await;
        store.state().failing_batches = vec![0];

        let report = ReminderPolicy::new([Some(5), Some(10), None])
            .regenerate_all(&store, calendar_id)
            .await
            .unwrap();

        assert_eq!(report.flushes, 1);
        assert_eq!(report.failed_flushes, 1);
        assert!(store.state().reminders.is_empty());
    }
}
