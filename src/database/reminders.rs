// file: src/database/reminders.rs
use crate::error::AppResult;
use crate::models::{AccountScope, StoredReminder};
use sqlx::SqlitePool;

pub async fn ids_for_event(
    pool: &SqlitePool,
    scope: &AccountScope,
    event_id: i64,
) -> AppResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT r.id
        FROM reminders r
        JOIN events e ON e.id = r.event_id
        JOIN calendars c ON c.id = e.calendar_id
        WHERE r.event_id = ?
            AND c.account_name = ?
            AND c.account_type = ?
        ORDER BY r.id ASC
        "#,
    )
    .bind(event_id)
    .bind(&scope.account_name)
    .bind(&scope.account_type)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

pub async fn list_for_event(pool: &SqlitePool, event_id: i64) -> AppResult<Vec<StoredReminder>> {
    let reminders = sqlx::query_as::<_, StoredReminder>(
        "SELECT id, event_id, minutes, method FROM reminders WHERE event_id = ? ORDER BY id ASC",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(reminders)
}

pub async fn count_all(pool: &SqlitePool) -> AppResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reminders")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
