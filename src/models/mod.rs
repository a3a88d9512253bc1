// Declare modules
pub mod calendar;
pub mod contact;
pub mod date;
pub mod event;
pub mod operation;
pub mod reminder;
pub mod settings;
pub mod sync;

// Re-export all public types so imports like `use crate::models::SourceEvent` work.
pub use calendar::{AccessLevel, AccountScope, CalendarSpec, ManagedCalendar};
pub use contact::{ContactEventRow, EventType, SourceEvent};
pub use date::{ParsedDate, NO_YEAR_SENTINEL, REAL_YEAR_THRESHOLD};
pub use event::{Availability, EventStatus, NewEvent, StoredEvent};
pub use operation::{Operation, OperationResult};
pub use reminder::{ReminderMethod, ReminderSpec, ReminderTarget, StoredReminder};
pub use settings::{Setting, Settings, DISABLED_REMINDER, REMINDER_SLOTS};
pub use sync::{SyncReport, SyncState};
