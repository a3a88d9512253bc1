// file: src/models/reminder.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// What a reminder insert points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderTarget {
    /// Position of an earlier insert-event operation in the same batch.
    BackRef(usize),
    /// Durable id of an event that already exists in the store.
    Event(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderMethod {
    Alert,
}

impl ReminderMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderMethod::Alert => "alert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSpec {
    pub minutes_before: u32,
    pub target: ReminderTarget,
    pub method: ReminderMethod,
}

impl ReminderSpec {
    pub fn alert(minutes_before: u32, target: ReminderTarget) -> Self {
        Self {
            minutes_before,
            target,
            method: ReminderMethod::Alert,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredReminder {
    pub id: i64,
    pub event_id: i64,
    pub minutes: i64,
    pub method: String,
}
