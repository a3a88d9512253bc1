// file: src/database/mod.rs

use crate::error::AppResult;
use crate::models::{
    AccountScope, CalendarSpec, Operation, OperationResult, Settings, SourceEvent,
};
use crate::store::{ContactSource, EventStore, PreferenceSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::BoxStream;
use log::info;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use std::str::FromStr;

// Declare submodules
pub mod batch;
pub mod calendars;
pub mod contacts;
pub mod events;
pub mod reminders;
pub mod settings;

/// Largest batch the store accepts in one transaction.
pub const DEFAULT_BATCH_LIMIT: usize = 500;

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database at `db_url` and apply the schema.
    pub async fn connect(db_url: &str) -> Result<Self> {
        let db_url = normalize_url(db_url);

        let db_exists = Sqlite::database_exists(&db_url)
            .await
            .context("Failed to check if database exists")?;
        if !db_exists {
            info!("Creating database");
            Sqlite::create_database(&db_url)
                .await
                .context("Failed to create database")?;
        }

        // WAL lets the contact cursor stay open while batches commit on
        // another connection.
        let options = SqliteConnectOptions::from_str(&db_url)
            .context("Invalid database URL")?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        run_schema(&pool).await.context("Failed to run database schema")?;

        info!("Database initialized successfully");

        Ok(Database { pool })
    }

    /// Event store limited to the rows of `scope`.
    pub fn event_store(&self, scope: AccountScope) -> SqliteEventStore {
        SqliteEventStore {
            pool: self.pool.clone(),
            scope,
            batch_limit: DEFAULT_BATCH_LIMIT,
        }
    }

    // --- Contact Delegates ---

    pub async fn add_contact_event(&self, row: &crate::models::ContactEventRow) -> AppResult<i64> {
        contacts::add(&self.pool, row).await
    }

    // --- Settings Delegates ---

    pub async fn get_settings(&self) -> AppResult<Settings> {
        settings::get(&self.pool).await
    }

    pub async fn update_settings(&self, settings: &Settings) -> AppResult<()> {
        settings::update(&self.pool, settings).await
    }
}

impl ContactSource for Database {
    fn source_events(&self) -> BoxStream<'_, AppResult<SourceEvent>> {
        contacts::stream(&self.pool)
    }
}

#[async_trait]
impl PreferenceSource for Database {
    async fn settings(&self) -> AppResult<Settings> {
        settings::get(&self.pool).await
    }

    async fn set_reminder(&self, slot: usize, minutes: Option<u32>) -> AppResult<()> {
        settings::set_reminder(&self.pool, slot, minutes).await
    }
}

/// SQLite event store bound to one account scope.
#[derive(Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
    scope: AccountScope,
    batch_limit: usize,
}

impl SqliteEventStore {
    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit;
        self
    }

    pub fn batch_limit(&self) -> usize {
        self.batch_limit
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    fn scope(&self) -> &AccountScope {
        &self.scope
    }

    async fn find_calendar(&self) -> AppResult<Option<i64>> {
        calendars::find_id(&self.pool, &self.scope).await
    }

    async fn insert_calendar(&self, spec: &CalendarSpec) -> AppResult<i64> {
        calendars::insert(&self.pool, &self.scope, spec).await
    }

    async fn update_calendar_color(&self, calendar_id: i64, color: i64) -> AppResult<()> {
        calendars::update_color(&self.pool, &self.scope, calendar_id, color).await
    }

    async fn event_ids(&self, calendar_id: i64) -> AppResult<Vec<i64>> {
        events::ids_for_calendar(&self.pool, &self.scope, calendar_id).await
    }

    async fn reminder_ids(&self, event_id: i64) -> AppResult<Vec<i64>> {
        reminders::ids_for_event(&self.pool, &self.scope, event_id).await
    }

    async fn delete_events(&self, calendar_id: i64) -> AppResult<u64> {
        events::delete_for_calendar(&self.pool, &self.scope, calendar_id).await
    }

    async fn apply_batch(&self, operations: &[Operation]) -> AppResult<Vec<OperationResult>> {
        batch::apply(&self.pool, &self.scope, operations, self.batch_limit).await
    }
}

/// Accept plain file paths as well as `sqlite:` URLs.
fn normalize_url(db_url: &str) -> String {
    if db_url.starts_with("sqlite:") {
        db_url.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", db_url)
    }
}

async fn run_schema(pool: &SqlitePool) -> Result<()> {
    let schema = include_str!("schema.sql");

    let mut current_statement = String::new();
    let mut in_trigger = false;

    for line in schema.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") || trimmed.is_empty() {
            continue;
        }

        if trimmed.to_uppercase().starts_with("CREATE TRIGGER") {
            in_trigger = true;
        }

        current_statement.push_str(line);
        current_statement.push('\n');

        if trimmed.ends_with(';') {
            if in_trigger {
                if trimmed.to_uppercase() == "END;" {
                    in_trigger = false;
                    sqlx::query(&current_statement).execute(pool).await?;
                    current_statement.clear();
                }
            } else {
                sqlx::query(&current_statement).execute(pool).await?;
                current_statement.clear();
            }
        }
    }
    Ok(())
}
