// file: src/database/batch.rs
use crate::error::{AppError, AppResult};
use crate::models::{
    AccountScope, NewEvent, Operation, OperationResult, ReminderSpec, ReminderTarget,
};
use crate::utils::logging;
use log::debug;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::time::Instant;

/// Apply `operations` in one transaction. Any failing operation rolls the
/// whole batch back. Back-references are resolved against the ids assigned
/// earlier in the same call.
pub async fn apply(
    pool: &SqlitePool,
    scope: &AccountScope,
    operations: &[Operation],
    limit: usize,
) -> AppResult<Vec<OperationResult>> {
    if operations.len() > limit {
        return Err(AppError::batch_apply(format!(
            "batch of {} operations exceeds the store limit of {}",
            operations.len(),
            limit
        )));
    }

    let started = Instant::now();
    let mut tx = pool.begin().await?;
    let mut results: Vec<OperationResult> = Vec::with_capacity(operations.len());

    for (position, operation) in operations.iter().enumerate() {
        let result = match operation {
            Operation::InsertEvent(event) => insert_event(&mut tx, scope, event).await?,
            Operation::InsertReminder(reminder) => {
                let event_id = resolve_target(operations, &results, position, reminder.target)?;
                insert_reminder(&mut tx, scope, event_id, reminder).await?
            }
            Operation::DeleteReminder(reminder_id) => {
                delete_reminder(&mut tx, scope, *reminder_id).await?
            }
        };
        results.push(result);
    }

    tx.commit().await?;

    debug!("Applied batch of {} operations", operations.len());
    logging::log_database_operation("BATCH", "events", started.elapsed().as_millis() as u64);
    Ok(results)
}

fn resolve_target(
    operations: &[Operation],
    results: &[OperationResult],
    position: usize,
    target: ReminderTarget,
) -> AppResult<i64> {
    match target {
        ReminderTarget::Event(event_id) => Ok(event_id),
        ReminderTarget::BackRef(index) => {
            let points_at_event = index < position
                && operations
                    .get(index)
                    .map(Operation::is_event_insert)
                    .unwrap_or(false);
            if !points_at_event {
                return Err(AppError::InvalidBackReference { index, position });
            }
            results
                .get(index)
                .and_then(OperationResult::inserted_id)
                .ok_or(AppError::InvalidBackReference { index, position })
        }
    }
}

async fn insert_event(
    tx: &mut Transaction<'_, Sqlite>,
    scope: &AccountScope,
    event: &NewEvent,
) -> AppResult<OperationResult> {
    let result = sqlx::query(
        r#"
        INSERT INTO events (
            calendar_id, title, start_time, end_time, all_day,
            availability, status, contact_lookup_key
        )
        SELECT ?, ?, ?, ?, ?, ?, ?, ?
        WHERE EXISTS (
            SELECT 1 FROM calendars WHERE id = ? AND account_name = ? AND account_type = ?
        )
        "#,
    )
    .bind(event.calendar_id)
    .bind(&event.title)
    .bind(event.start_time)
    .bind(event.end_time)
    .bind(event.all_day)
    .bind(event.availability.as_str())
    .bind(event.status.as_str())
    .bind(&event.contact_lookup_key)
    .bind(event.calendar_id)
    .bind(&scope.account_name)
    .bind(&scope.account_type)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::batch_apply(format!(
            "calendar {} is not managed by account '{}'",
            event.calendar_id, scope.account_name
        )));
    }

    Ok(OperationResult::Inserted(result.last_insert_rowid()))
}

async fn insert_reminder(
    tx: &mut Transaction<'_, Sqlite>,
    scope: &AccountScope,
    event_id: i64,
    reminder: &ReminderSpec,
) -> AppResult<OperationResult> {
    let result = sqlx::query(
        r#"
        INSERT INTO reminders (event_id, minutes, method)
        SELECT ?, ?, ?
        WHERE EXISTS (
            SELECT 1 FROM events e
            JOIN calendars c ON c.id = e.calendar_id
            WHERE e.id = ? AND c.account_name = ? AND c.account_type = ?
        )
        "#,
    )
    .bind(event_id)
    .bind(i64::from(reminder.minutes_before))
    .bind(reminder.method.as_str())
    .bind(event_id)
    .bind(&scope.account_name)
    .bind(&scope.account_type)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::batch_apply(format!(
            "event {} is not managed by account '{}'",
            event_id, scope.account_name
        )));
    }

    Ok(OperationResult::Inserted(result.last_insert_rowid()))
}

async fn delete_reminder(
    tx: &mut Transaction<'_, Sqlite>,
    scope: &AccountScope,
    reminder_id: i64,
) -> AppResult<OperationResult> {
    let result = sqlx::query(
        r#"
        DELETE FROM reminders WHERE id = ? AND event_id IN (
            SELECT e.id FROM events e
            JOIN calendars c ON c.id = e.calendar_id
            WHERE c.account_name = ? AND c.account_type = ?
        )
        "#,
    )
    .bind(reminder_id)
    .bind(&scope.account_name)
    .bind(&scope.account_type)
    .execute(&mut **tx)
    .await?;

    Ok(OperationResult::Deleted(result.rows_affected()))
}
