//! Full-refresh sync from contact events to the managed calendar.
//!
//! A run resolves the calendar, deletes everything generated last time,
//! then walks the contact events and queues one all-day entry per
//! projected year plus its reminders. Queued operations are flushed in
//! chunks of at most [`batch::FLUSH_THRESHOLD`]; a rejected chunk is
//! dropped and the run carries on.

pub mod batch;
pub mod date_parser;
pub mod title;

use crate::calendar::CalendarResolver;
use crate::error::AppResult;
use crate::models::{NewEvent, ParsedDate, Settings, SourceEvent, SyncReport, SyncState};
use crate::reminders::ReminderPolicy;
use crate::store::{Clock, ContactSource, EventStore};
use crate::utils::logging;
use batch::{FlushOutcome, PendingBatch, FLUSH_THRESHOLD};
use futures::StreamExt;
use log::{error, info, warn};
use std::ops::RangeInclusive;
use tokio_util::sync::CancellationToken;

pub use date_parser::parse_event_date;
pub use title::{TitleGenerator, Translations};

pub const YEARS_BACK: i32 = 3;
pub const YEARS_AHEAD: i32 = 5;

const JOB: &str = "Sync";

/// Years a source event is projected into, relative to `current_year`.
pub fn projected_years(current_year: i32) -> RangeInclusive<i32> {
    (current_year - YEARS_BACK)..=(current_year + YEARS_AHEAD)
}

/// One calendar entry to create and the reminder offsets to attach to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub year: i32,
    pub event: NewEvent,
    pub reminder_minutes: Vec<u32>,
}

/// Expand a parsed source event over the projection window. Years without
/// a title (no display name) produce nothing, reminders included.
pub fn project(
    source: &SourceEvent,
    parsed: &ParsedDate,
    current_year: i32,
    calendar_id: i64,
    titles: &TitleGenerator,
    reminders: &ReminderPolicy,
) -> Vec<Projection> {
    let minutes = reminders.enabled_minutes();
    let mut projections = Vec::new();

    for year in projected_years(current_year) {
        let age = year - parsed.year;
        let include_age = parsed.has_real_year() && age >= 0;
        let title = match titles.title(
            source.event_type,
            source.custom_label.as_deref(),
            source.display_name.as_deref(),
            include_age,
            age,
        ) {
            Some(title) => title,
            None => continue,
        };
        let Some((start, end)) = parsed.all_day_span(year) else {
            continue;
        };

        projections.push(Projection {
            year,
            event: NewEvent::all_day(calendar_id, title, start, end, source.lookup_key.clone()),
            reminder_minutes: minutes.clone(),
        });
    }

    projections
}

pub struct SyncOrchestrator<'a, S: ?Sized, C: ?Sized, K: ?Sized> {
    store: &'a S,
    contacts: &'a C,
    clock: &'a K,
}

impl<'a, S, C, K> SyncOrchestrator<'a, S, C, K>
where
    S: EventStore + ?Sized,
    C: ContactSource + ?Sized,
    K: Clock + ?Sized,
{
    pub fn new(store: &'a S, contacts: &'a C, clock: &'a K) -> Self {
        Self {
            store,
            contacts,
            clock,
        }
    }

    /// Run one full refresh.
    ///
    /// Fails only when the calendar cannot be resolved or the purge fails.
    /// Rejected chunks are counted in the report. Cancellation is checked
    /// before each source event; operations still pending at that point are
    /// dropped, not flushed.
    pub async fn run(
        &self,
        settings: &Settings,
        cancel: &CancellationToken,
    ) -> AppResult<SyncReport> {
        let mut state = SyncState::Idle;
        let titles = TitleGenerator::for_language(&settings.language);

        enter(&mut state, SyncState::Resolving);
        let resolver = CalendarResolver::new(
            self.store,
            titles.translations().calendar_display_name,
            settings.color,
        );
        let calendar_id = match resolver.resolve().await {
            Ok(id) => id,
            Err(e) => {
                enter(&mut state, SyncState::Failed);
                error!("Cannot resolve the managed calendar: {}", e);
                return Err(e);
            }
        };
        let mut report = SyncReport::new(calendar_id);

        enter(&mut state, SyncState::Purging);
        report.purged_events = match self.store.delete_events(calendar_id).await {
            Ok(count) => count,
            Err(e) => {
                enter(&mut state, SyncState::Failed);
                error!("Purging calendar {} failed: {}", calendar_id, e);
                return Err(e);
            }
        };

        enter(&mut state, SyncState::Generating);
        let reminders = ReminderPolicy::from_settings(settings);
        let current_year = self.clock.current_year();
        let window = projected_years(current_year).count();
        let mut batch = PendingBatch::new(FLUSH_THRESHOLD);

        let mut contacts = self.contacts.source_events();
        loop {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let source = match contacts.next().await {
                Some(Ok(source)) => source,
                Some(Err(e)) => {
                    warn!("Skipping unreadable contact row: {}", e.to_safe_string());
                    continue;
                }
                None => break,
            };
            report.source_events += 1;

            let parsed = source
                .raw_date
                .as_deref()
                .and_then(|raw| parse_event_date(raw, settings.prefer_dd_slash_mm));
            let Some(parsed) = parsed else {
                warn!(
                    "Skipping event with unparseable date {:?}",
                    source.raw_date.as_deref().unwrap_or_default()
                );
                report.unparseable += 1;
                continue;
            };
            report.projections += window;

            let projections = project(
                &source,
                &parsed,
                current_year,
                calendar_id,
                &titles,
                &reminders,
            );
            for projection in projections {
                let group_len = 1 + projection.reminder_minutes.len();
                if batch.would_overflow(group_len) {
                    self.flush(&mut batch, &mut report).await;
                }
                batch.push_group(projection.event, &projection.reminder_minutes);
                report.events_queued += 1;
                report.reminders_queued += projection.reminder_minutes.len();
                if batch.is_full() {
                    self.flush(&mut batch, &mut report).await;
                }
            }
        }
        drop(contacts);

        if report.cancelled {
            info!("Sync cancelled, dropping {} pending operations", batch.len());
            report.discarded_operations += batch.take().len();
        } else {
            enter(&mut state, SyncState::Flushing);
            self.flush(&mut batch, &mut report).await;
        }

        enter(&mut state, SyncState::Done);
        report.finish();
        logging::log_sync_summary(&report);
        Ok(report)
    }

    async fn flush(&self, batch: &mut PendingBatch, report: &mut SyncReport) {
        match batch.flush(self.store, JOB).await {
            FlushOutcome::Empty => {}
            FlushOutcome::Applied(_) => report.flushes += 1,
            FlushOutcome::Failed(dropped) => {
                report.flushes += 1;
                report.failed_flushes += 1;
                report.discarded_operations += dropped;
            }
        }
    }
}

fn enter(state: &mut SyncState, next: SyncState) {
    info!("Sync state {} -> {}", state.as_str(), next.as_str());
    *state = next;
}
