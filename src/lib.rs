// Birthday Sync Library
// Mirrors contact birthdays and anniversaries into a managed calendar

pub mod calendar;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod reminders;
pub mod runner;
pub mod store;
pub mod sync;
pub mod utils;

// Re-export commonly used types
pub use calendar::CalendarResolver;
pub use config::{validate_config, AppConfig};
pub use database::{Database, SqliteEventStore};
pub use error::{AppError, AppResult};
pub use models::*;
pub use reminders::{ReminderPolicy, ReminderReport};
pub use runner::SyncRunner;
pub use store::{Clock, ContactSource, EventStore, PreferenceSource, SystemClock};
pub use sync::{parse_event_date, project, SyncOrchestrator, TitleGenerator};
