// Managed calendar lookup
// Finds the calendar owned by the sync account, creating it on first use.

use crate::error::{AppError, AppResult};
use crate::models::CalendarSpec;
use crate::store::EventStore;
use log::{debug, info, warn};

pub struct CalendarResolver<'a, S: EventStore + ?Sized> {
    store: &'a S,
    display_name: &'a str,
    color: i64,
}

impl<'a, S: EventStore + ?Sized> CalendarResolver<'a, S> {
    pub fn new(store: &'a S, display_name: &'a str, color: i64) -> Self {
        Self {
            store,
            display_name,
            color,
        }
    }

    /// Id of the managed calendar. At most one insert is attempted; a
    /// failed insert is followed by a single re-query in case someone else
    /// created the calendar in between.
    pub async fn resolve(&self) -> AppResult<i64> {
        if let Some(id) = self.lookup().await? {
            debug!("Using managed calendar {}", id);
            return Ok(id);
        }

        info!(
            "No calendar for account '{}', creating '{}'",
            self.store.scope().account_name,
            self.display_name
        );
        let spec = CalendarSpec::managed(self.store.scope(), self.display_name, self.color);
        if let Err(e) = self.store.insert_calendar(&spec).await {
            warn!("Creating the managed calendar failed: {}", e.to_safe_string());
        }

        match self.lookup().await? {
            Some(id) => {
                info!("Managed calendar {} ready", id);
                Ok(id)
            }
            None => Err(AppError::calendar_creation(format!(
                "no calendar for account '{}' after insert",
                self.store.scope().account_name
            ))),
        }
    }

    /// Recolor the managed calendar, creating it first if needed.
    pub async fn update_color(&self, color: i64) -> AppResult<i64> {
        let calendar_id = self.resolve().await?;
        self.store.update_calendar_color(calendar_id, color).await?;
        info!("Calendar {} color set to {:#010X}", calendar_id, color);
        Ok(calendar_id)
    }

    async fn lookup(&self) -> AppResult<Option<i64>> {
        self.store
            .find_calendar()
            .await
            .map_err(|e| AppError::calendar_creation(format!("lookup failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccessLevel;
    use crate::store::fake::FakeEventStore;

    #[tokio::test]
    async fn test_creates_calendar_once() {
        let store = FakeEventStore::new();
        let resolver = CalendarResolver::new(&store, "Birthdays", 0xFF00FF00);

        let first = resolver.resolve().await.unwrap();
        let second = resolver.resolve().await.unwrap();

        assert_eq!(first, second);
        let state = store.state();
        assert_eq!(state.insert_calendar_calls, 1);
        let (_, spec) = state.calendar.as_ref().unwrap();
        assert_eq!(spec.display_name, "Birthdays");
        assert_eq!(spec.access_level, AccessLevel::Read);
        assert_eq!(spec.owner_account, "Birthday Sync");
        assert!(spec.visible && spec.sync_events);
    }

    #[tokio::test]
    async fn test_failed_insert_is_creation_failure() {
        let store = FakeEventStore::new();
        store.state().fail_insert_calendar = true;

        let err = CalendarResolver::new(&store, "Birthdays", 0)
            .resolve()
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CalendarCreation(_)));
        assert_eq!(store.state().insert_calendar_calls, 1);
    }

    #[tokio::test]
    async fn test_lost_race_uses_existing_calendar() {
        let store = FakeEventStore::new();
        store.state().lose_insert_race = true;

        let id = CalendarResolver::new(&store, "Birthdays", 0)
            .resolve()
            .await
            .unwrap();

        assert_eq!(store.find_calendar().await.unwrap(), Some(id));
        assert_eq!(store.state().insert_calendar_calls, 1);
    }

    #[tokio::test]
    async fn test_update_color() {
        let store = FakeEventStore::new();
        let resolver = CalendarResolver::new(&store, "Birthdays", 1);
        let id = resolver.resolve().await.unwrap();

        assert_eq!(resolver.update_color(0xFFFF0000).await.unwrap(), id);
        assert_eq!(store.state().calendar.as_ref().unwrap().1.color, 0xFFFF0000);
    }
}
