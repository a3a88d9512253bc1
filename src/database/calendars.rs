// file: src/database/calendars.rs
use crate::error::{AppError, AppResult};
use crate::models::{AccountScope, CalendarSpec, ManagedCalendar};
use sqlx::SqlitePool;

pub async fn find_id(pool: &SqlitePool, scope: &AccountScope) -> AppResult<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM calendars WHERE account_name = ? AND account_type = ? ORDER BY id LIMIT 1",
    )
    .bind(&scope.account_name)
    .bind(&scope.account_type)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

pub async fn get(pool: &SqlitePool, scope: &AccountScope) -> AppResult<Option<ManagedCalendar>> {
    let calendar = sqlx::query_as::<_, ManagedCalendar>(
        r#"
        SELECT
            id, account_name, account_type, name, display_name, color,
            access_level, owner_account, sync_events, visible
        FROM calendars
        WHERE account_name = ? AND account_type = ?
        "#,
    )
    .bind(&scope.account_name)
    .bind(&scope.account_type)
    .fetch_optional(pool)
    .await?;

    Ok(calendar)
}

/// Insert the calendar described by `spec`. The spec must carry the same
/// scope as the store issuing the request.
pub async fn insert(
    pool: &SqlitePool,
    scope: &AccountScope,
    spec: &CalendarSpec,
) -> AppResult<i64> {
    if &spec.scope != scope {
        return Err(AppError::invalid_input(format!(
            "calendar for account '{}' cannot be created through store scoped to '{}'",
            spec.scope.account_name, scope.account_name
        )));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO calendars (
            account_name, account_type, name, display_name, color,
            access_level, owner_account, sync_events, visible
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&spec.scope.account_name)
    .bind(&spec.scope.account_type)
    .bind(&spec.name)
    .bind(&spec.display_name)
    .bind(spec.color)
    .bind(spec.access_level.as_str())
    .bind(&spec.owner_account)
    .bind(spec.sync_events)
    .bind(spec.visible)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_color(
    pool: &SqlitePool,
    scope: &AccountScope,
    calendar_id: i64,
    color: i64,
) -> AppResult<()> {
    let result = sqlx::query(
        "UPDATE calendars SET color = ? WHERE id = ? AND account_name = ? AND account_type = ?",
    )
    .bind(color)
    .bind(calendar_id)
    .bind(&scope.account_name)
    .bind(&scope.account_type)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("calendar {}", calendar_id)));
    }

    Ok(())
}
