// file: src/database/contacts.rs
use crate::error::{AppError, AppResult};
use crate::models::{ContactEventRow, SourceEvent};
use futures::stream::{BoxStream, StreamExt};
use sqlx::SqlitePool;

/// Stream every contact event that has a type set. The query cursor lives
/// as long as the returned stream.
pub fn stream(pool: &SqlitePool) -> BoxStream<'_, AppResult<SourceEvent>> {
    sqlx::query_as::<_, ContactEventRow>(
        r#"
        SELECT display_name, contact_id, lookup_key, start_date, event_type, label
        FROM contact_events
        WHERE event_type IS NOT NULL
        ORDER BY id ASC
        "#,
    )
    .fetch(pool)
    .map(|row| row.map(SourceEvent::from).map_err(AppError::from))
    .boxed()
}

pub async fn add(pool: &SqlitePool, row: &ContactEventRow) -> AppResult<i64> {
    let result = sqlx::query(
        "INSERT INTO contact_events (contact_id, display_name, lookup_key, start_date, event_type, label) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(row.contact_id)
    .bind(&row.display_name)
    .bind(&row.lookup_key)
    .bind(&row.start_date)
    .bind(row.event_type)
    .bind(&row.label)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::tests::create_test_database;
    use crate::models::EventType;

    #[tokio::test]
    async fn test_rows_without_type_are_skipped() {
        let db = create_test_database().await;
        add(
            &db.pool,
            &ContactEventRow {
                display_name: Some("Ada".to_string()),
                contact_id: 1,
                lookup_key: None,
                start_date: Some("1990-05-20".to_string()),
                event_type: EventType::Birthday.code(),
                label: None,
            },
        )
        .await
        .unwrap();
        sqlx::query("INSERT INTO contact_events (contact_id, display_name, start_date) VALUES (2, 'Untyped', '2000-01-01')")
            .execute(&db.pool)
            .await
            .unwrap();

        let events: Vec<_> = stream(&db.pool).collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].as_ref().unwrap().display_name.as_deref(),
            Some("Ada")
        );
    }
}
