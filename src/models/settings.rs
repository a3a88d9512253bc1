// file: src/models/settings.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored value meaning "no reminder in this slot".
pub const DISABLED_REMINDER: i64 = -1;

pub const REMINDER_SLOTS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub reminder_minutes: [Option<u32>; REMINDER_SLOTS], // minutes before the event
    pub prefer_dd_slash_mm: bool,
    pub color: i64, // ARGB
    pub language: String,
}

impl Settings {
    pub fn reminder_key(slot: usize) -> String {
        format!("reminder_{}", slot)
    }

    /// Decode a stored slot value; negative or garbage means disabled.
    pub fn parse_reminder(value: &str) -> Option<u32> {
        match value.trim().parse::<i64>() {
            Ok(minutes) if minutes >= 0 => u32::try_from(minutes).ok(),
            _ => None,
        }
    }

    pub fn encode_reminder(minutes: Option<u32>) -> String {
        minutes
            .map(|m| m.to_string())
            .unwrap_or_else(|| DISABLED_REMINDER.to_string())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reminder_minutes: [Some(1440), None, None], // one day before
            prefer_dd_slash_mm: false,
            color: 0xFF1976D2,
            language: "en".to_string(),
        }
    }
}
