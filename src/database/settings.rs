// file: src/database/settings.rs
use crate::error::{AppError, AppResult};
use crate::models::{Setting, Settings, REMINDER_SLOTS};
use sqlx::SqlitePool;

pub async fn get(pool: &SqlitePool) -> AppResult<Settings> {
    let settings = sqlx::query_as::<_, Setting>("SELECT key, value FROM settings")
        .fetch_all(pool)
        .await?;

    // Convert to Settings struct
    let mut app_settings = Settings::default();
    for setting in settings {
        match setting.key.as_str() {
            "reminder_0" => app_settings.reminder_minutes[0] = Settings::parse_reminder(&setting.value),
            "reminder_1" => app_settings.reminder_minutes[1] = Settings::parse_reminder(&setting.value),
            "reminder_2" => app_settings.reminder_minutes[2] = Settings::parse_reminder(&setting.value),
            "prefer_dd_slash_mm" => {
                app_settings.prefer_dd_slash_mm = setting.value.parse().unwrap_or(false)
            }
            "color" => app_settings.color = setting.value.parse().unwrap_or(0xFF1976D2),
            "language" => app_settings.language = setting.value,
            _ => {}
        }
    }

    Ok(app_settings)
}

pub async fn update(pool: &SqlitePool, settings: &Settings) -> AppResult<()> {
    let mut updates: Vec<(String, String)> = settings
        .reminder_minutes
        .iter()
        .enumerate()
        .map(|(slot, minutes)| (Settings::reminder_key(slot), Settings::encode_reminder(*minutes)))
        .collect();
    updates.push(("prefer_dd_slash_mm".to_string(), settings.prefer_dd_slash_mm.to_string()));
    updates.push(("color".to_string(), settings.color.to_string()));
    updates.push(("language".to_string(), settings.language.clone()));

    for (key, value) in updates {
        upsert(pool, &key, &value).await?;
    }

    Ok(())
}

pub async fn set_reminder(pool: &SqlitePool, slot: usize, minutes: Option<u32>) -> AppResult<()> {
    if slot >= REMINDER_SLOTS {
        return Err(AppError::invalid_input(format!(
            "reminder slot {} out of range 0..{}",
            slot, REMINDER_SLOTS
        )));
    }

    upsert(pool, &Settings::reminder_key(slot), &Settings::encode_reminder(minutes)).await
}

async fn upsert(pool: &SqlitePool, key: &str, value: &str) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}
