use crate::error::AppError;
use crate::models::SyncReport;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter, SetLoggerError};
use std::env;
use std::io::Write;

fn level_from_env(value: &str) -> LevelFilter {
    match value.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

pub fn init_logging() -> Result<(), SetLoggerError> {
    let env = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_level = level_from_env(&env);

    let mut builder = Builder::from_default_env();

    builder.format(|buf, record| {
        let timestamp = buf.timestamp();
        let target = record.target();
        let file = record.file().unwrap_or("unknown");
        let line = record.line().unwrap_or(0);

        match record.level() {
            Level::Info => writeln!(buf, "{} [INFO] [{}]: {}", timestamp, target, record.args()),
            level => writeln!(
                buf,
                "{} [{}] [{}:{}] {}: {}",
                timestamp,
                level,
                file,
                line,
                target,
                record.args()
            ),
        }
    });

    // Filter out noisy modules in production
    if env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production" {
        builder.filter_module("sqlx", LevelFilter::Warn);
        builder.filter_module("tokio", LevelFilter::Info);
    }

    builder.filter_level(log_level).target(Target::Stderr).try_init()
}

pub fn log_sync_summary(report: &SyncReport) {
    log::info!(
        "[Sync] calendar {}: {} source events ({} unparseable), {} events and {} reminders queued, {} flushes ({} failed), {} purged{}",
        report.calendar_id,
        report.source_events,
        report.unparseable,
        report.events_queued,
        report.reminders_queued,
        report.flushes,
        report.failed_flushes,
        report.purged_events,
        if report.cancelled { ", cancelled" } else { "" }
    );
    if report.is_partial() {
        log::warn!(
            "[Sync] Run was partial: {} operations never reached the store",
            report.discarded_operations
        );
    }
}

pub fn log_batch_failure(kind: &str, operations: usize, error: &AppError) {
    log::warn!(
        "[{}] Dropping batch of {} operations: {}",
        kind,
        operations,
        error.to_safe_string()
    );
    log::debug!("[{}] Batch failure detail: {}", kind, error);
}

pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64) {
    log::debug!("[Database] {} on table {} took {}ms", operation, table, duration_ms);
}
