// file: src/models/contact.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Kind of date stored against a contact.
///
/// Codes follow the contact provider's numbering: `0` custom, `1`
/// anniversary, `2` other, `3` birthday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Custom,
    Anniversary,
    Other,
    Birthday,
}

impl EventType {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => EventType::Custom,
            1 => EventType::Anniversary,
            3 => EventType::Birthday,
            2 => EventType::Other,
            unknown => {
                log::debug!("Unknown contact event type {}, treating as other", unknown);
                EventType::Other
            }
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            EventType::Custom => 0,
            EventType::Anniversary => 1,
            EventType::Other => 2,
            EventType::Birthday => 3,
        }
    }
}

/// Raw row returned by the contact store.
#[derive(Debug, Clone, FromRow)]
pub struct ContactEventRow {
    pub display_name: Option<String>,
    pub contact_id: i64,
    pub lookup_key: Option<String>,
    pub start_date: Option<String>,
    pub event_type: i64,
    pub label: Option<String>,
}

/// One dated fact about a contact, as delivered for a single sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEvent {
    pub display_name: Option<String>,
    pub lookup_key: Option<String>,
    pub raw_date: Option<String>,
    pub event_type: EventType,
    pub custom_label: Option<String>,
}

impl SourceEvent {
    pub fn new(display_name: &str, raw_date: &str, event_type: EventType) -> Self {
        Self {
            display_name: Some(display_name.to_string()),
            lookup_key: None,
            raw_date: Some(raw_date.to_string()),
            event_type,
            custom_label: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.custom_label = Some(label.to_string());
        self
    }

    pub fn with_lookup_key(mut self, lookup_key: &str) -> Self {
        self.lookup_key = Some(lookup_key.to_string());
        self
    }
}

impl From<ContactEventRow> for SourceEvent {
    fn from(row: ContactEventRow) -> Self {
        Self {
            display_name: row.display_name,
            lookup_key: row.lookup_key,
            raw_date: row.start_date,
            event_type: EventType::from_code(row.event_type),
            custom_label: row.label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_codes() {
        assert_eq!(EventType::from_code(0), EventType::Custom);
        assert_eq!(EventType::from_code(1), EventType::Anniversary);
        assert_eq!(EventType::from_code(2), EventType::Other);
        assert_eq!(EventType::from_code(3), EventType::Birthday);
        assert_eq!(EventType::from_code(42), EventType::Other);
        assert_eq!(EventType::Birthday.code(), 3);
    }

    #[test]
    fn test_source_event_from_row() {
        let row = ContactEventRow {
            display_name: Some("Ada".to_string()),
            contact_id: 7,
            lookup_key: Some("0r7-ada".to_string()),
            start_date: Some("1990-05-20".to_string()),
            event_type: 0,
            label: Some("Name day".to_string()),
        };

        let event = SourceEvent::from(row);
        assert_eq!(event.display_name.as_deref(), Some("Ada"));
        assert_eq!(event.lookup_key.as_deref(), Some("0r7-ada"));
        assert_eq!(event.event_type, EventType::Custom);
        assert_eq!(event.custom_label.as_deref(), Some("Name day"));
    }
}
