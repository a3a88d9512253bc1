// file: src/database/events.rs
use crate::error::AppResult;
use crate::models::{AccountScope, StoredEvent};
use crate::utils::logging;
use sqlx::SqlitePool;
use std::time::Instant;

pub async fn ids_for_calendar(
    pool: &SqlitePool,
    scope: &AccountScope,
    calendar_id: i64,
) -> AppResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT e.id
        FROM events e
        JOIN calendars c ON c.id = e.calendar_id
        WHERE e.calendar_id = ?
            AND c.account_name = ?
            AND c.account_type = ?
        ORDER BY e.id ASC
        "#,
    )
    .bind(calendar_id)
    .bind(&scope.account_name)
    .bind(&scope.account_type)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

pub async fn list_for_calendar(
    pool: &SqlitePool,
    scope: &AccountScope,
    calendar_id: i64,
) -> AppResult<Vec<StoredEvent>> {
    let events = sqlx::query_as::<_, StoredEvent>(
        r#"
        SELECT
            e.id, e.calendar_id, e.title, e.start_time, e.end_time, e.all_day,
            e.availability, e.status, e.contact_lookup_key
        FROM events e
        JOIN calendars c ON c.id = e.calendar_id
        WHERE e.calendar_id = ?
            AND c.account_name = ?
            AND c.account_type = ?
        ORDER BY e.start_time ASC, e.title ASC
        "#,
    )
    .bind(calendar_id)
    .bind(&scope.account_name)
    .bind(&scope.account_type)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

/// Remove every event of the calendar together with its reminders.
/// Returns the number of events deleted.
pub async fn delete_for_calendar(
    pool: &SqlitePool,
    scope: &AccountScope,
    calendar_id: i64,
) -> AppResult<u64> {
    let started = Instant::now();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM reminders WHERE event_id IN (
            SELECT e.id FROM events e
            JOIN calendars c ON c.id = e.calendar_id
            WHERE e.calendar_id = ? AND c.account_name = ? AND c.account_type = ?
        )
        "#,
    )
    .bind(calendar_id)
    .bind(&scope.account_name)
    .bind(&scope.account_type)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query(
        r#"
        DELETE FROM events WHERE calendar_id IN (
            SELECT id FROM calendars
            WHERE id = ? AND account_name = ? AND account_type = ?
        )
        "#,
    )
    .bind(calendar_id)
    .bind(&scope.account_name)
    .bind(&scope.account_type)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    logging::log_database_operation("DELETE", "events", started.elapsed().as_millis() as u64);
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::batch;
    use crate::database::tests::{create_test_database, test_scope};
    use crate::database::{calendars, reminders};
    use crate::models::{CalendarSpec, NewEvent, Operation, ReminderSpec, ReminderTarget};
    use chrono::{Duration, TimeZone, Utc};

    fn event(calendar_id: i64, title: &str, day: u32) -> Operation {
        let start = Utc.with_ymd_and_hms(2024, 5, day, 0, 0, 0).unwrap();
        Operation::InsertEvent(NewEvent::all_day(
            calendar_id,
            title.to_string(),
            start,
            start + Duration::days(1),
            None,
        ))
    }

    #[tokio::test]
    async fn test_delete_for_calendar_clears_reminders() {
        let db = create_test_database().await;
        let scope = test_scope();
        let spec = CalendarSpec::managed(&scope, "B", 0);
        let calendar_id = calendars::insert(&db.pool, &scope, &spec).await.unwrap();

        let ops = vec![
            event(calendar_id, "Ada's Birthday", 20),
            Operation::InsertReminder(ReminderSpec::alert(60, ReminderTarget::BackRef(0))),
            event(calendar_id, "Bea's Birthday", 21),
            Operation::InsertReminder(ReminderSpec::alert(60, ReminderTarget::BackRef(2))),
        ];
        batch::apply(&db.pool, &scope, &ops, 10).await.unwrap();
        assert_eq!(ids_for_calendar(&db.pool, &scope, calendar_id).await.unwrap().len(), 2);

        let deleted = delete_for_calendar(&db.pool, &scope, calendar_id).await.unwrap();
        assert_eq!(deleted, 2);
        assert!(ids_for_calendar(&db.pool, &scope, calendar_id).await.unwrap().is_empty());
        assert_eq!(reminders::count_all(&db.pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_for_calendar_respects_scope() {
        let db = create_test_database().await;
        let scope = test_scope();
        let spec = CalendarSpec::managed(&scope, "B", 0);
        let calendar_id = calendars::insert(&db.pool, &scope, &spec).await.unwrap();
        batch::apply(&db.pool, &scope, &[event(calendar_id, "Ada", 20)], 10)
            .await
            .unwrap();

        let other = AccountScope::new("Other", "com.example");
        let deleted = delete_for_calendar(&db.pool, &other, calendar_id).await.unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(list_for_calendar(&db.pool, &scope, calendar_id).await.unwrap().len(), 1);
    }
}
