// file: src/models/event.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Free,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Free => "free",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Confirmed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Confirmed => "confirmed",
        }
    }
}

/// A calendar entry generated for one (source event, year) pair. It has no
/// id until the batch carrying it is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub calendar_id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
    pub availability: Availability,
    pub status: EventStatus,
    pub contact_lookup_key: Option<String>,
}

impl NewEvent {
    /// Free, confirmed, all-day entry. Availability is free so the entry
    /// never shows up as a scheduling conflict.
    pub fn all_day(
        calendar_id: i64,
        title: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        contact_lookup_key: Option<String>,
    ) -> Self {
        Self {
            calendar_id,
            title,
            start_time,
            end_time,
            all_day: true,
            availability: Availability::Free,
            status: EventStatus::Confirmed,
            contact_lookup_key,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredEvent {
    pub id: i64,
    pub calendar_id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
    pub availability: String,
    pub status: String,
    pub contact_lookup_key: Option<String>,
}

impl StoredEvent {
    pub fn duration_hours(&self) -> i64 {
        (self.end_time - self.start_time).num_hours()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_new_event_all_day_defaults() {
        let start = Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap();
        let event = NewEvent::all_day(
            1,
            "Ada's Birthday (34)".to_string(),
            start,
            start + Duration::days(1),
            Some("lookup-ada".to_string()),
        );

        assert!(event.all_day);
        assert_eq!(event.availability, Availability::Free);
        assert_eq!(event.status, EventStatus::Confirmed);
        assert_eq!(event.availability.as_str(), "free");
        assert_eq!(event.status.as_str(), "confirmed");
    }
}
