use crate::calendar::CalendarResolver;
use crate::error::{AppError, AppResult};
use crate::models::SyncReport;
use crate::reminders::{ReminderPolicy, ReminderReport};
use crate::store::{Clock, ContactSource, EventStore, PreferenceSource, SystemClock};
use crate::sync::{SyncOrchestrator, Translations};
use log::info;
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Entry point for callers. Serializes jobs that touch the managed
/// calendar: a second job started while one is running fails with
/// [`AppError::SyncInProgress`] instead of waiting.
pub struct SyncRunner<S, C, P, K = SystemClock> {
    store: S,
    contacts: C,
    preferences: P,
    clock: K,
    running: Mutex<()>,
    shutdown: CancellationToken,
}

impl<S, C, P> SyncRunner<S, C, P, SystemClock>
where
    S: EventStore,
    C: ContactSource,
    P: PreferenceSource,
{
    pub fn new(store: S, contacts: C, preferences: P) -> Self {
        Self::with_clock(store, contacts, preferences, SystemClock)
    }
}

impl<S, C, P, K> SyncRunner<S, C, P, K>
where
    S: EventStore,
    C: ContactSource,
    P: PreferenceSource,
    K: Clock,
{
    pub fn with_clock(store: S, contacts: C, preferences: P, clock: K) -> Self {
        Self {
            store,
            contacts,
            preferences,
            clock,
            running: Mutex::new(()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops a running sync before its next source event.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn cancel(&self) {
        self.shutdown.cancel();
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn sync(&self) -> AppResult<SyncReport> {
        let _guard = self.acquire()?;
        let settings = self.preferences.settings().await?;
        SyncOrchestrator::new(&self.store, &self.contacts, &self.clock)
            .run(&settings, &self.shutdown)
            .await
    }

    /// Persist a new offset for `slot` and rewrite the reminders of all
    /// existing events. `None` disables the slot.
    pub async fn update_reminder(
        &self,
        slot: usize,
        minutes: Option<u32>,
    ) -> AppResult<ReminderReport> {
        let _guard = self.acquire()?;
        let settings = self.preferences.settings().await?;
        let policy = ReminderPolicy::from_settings(&settings).with_override(slot, minutes)?;
        self.preferences.set_reminder(slot, minutes).await?;
        info!("Reminder slot {} set to {:?}", slot, minutes);

        let calendar_id = self.resolver(&settings, settings.color).resolve().await?;
        policy.regenerate_all(&self.store, calendar_id).await
    }

    pub async fn update_calendar_color(&self, color: i64) -> AppResult<i64> {
        let _guard = self.acquire()?;
        let settings = self.preferences.settings().await?;
        self.resolver(&settings, color).update_color(color).await
    }

    fn resolver(&self, settings: &crate::models::Settings, color: i64) -> CalendarResolver<'_, S> {
        let translations = Translations::for_language(&settings.language);
        CalendarResolver::new(&self.store, translations.calendar_display_name, color)
    }

    fn acquire(&self) -> AppResult<MutexGuard<'_, ()>> {
        self.running.try_lock().map_err(|_| AppError::SyncInProgress)
    }
}
