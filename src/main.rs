// Birthday Sync - command line entry point

use anyhow::{Context, Result};
use birthday_sync::utils::logging;
use birthday_sync::{validate_config, AppConfig, Database, SyncRunner};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::path::Path;

#[derive(Parser)]
#[command(name = "birthday-sync")]
#[command(about = "Mirror contact birthdays and anniversaries into a calendar")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild every generated calendar entry (default)
    Sync {
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one reminder slot and rewrite existing reminders
    Reminder {
        /// Slot 0, 1 or 2
        slot: usize,

        /// Minutes before the event, or "off"
        minutes: String,
    },
    /// Set the calendar color (ARGB, e.g. 0xFF1976D2 or #FF1976D2)
    Color { argb: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging().context("Failed to initialize logging")?;
    let cli = Cli::parse();

    let config = AppConfig::from_env().context("Failed to read configuration")?;
    validate_config(&config)?;

    if let Some(parent) = Path::new(&config.database).parent() {
        if !config.database.starts_with("sqlite:") && !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let db = Database::connect(&config.database).await?;
    let store = db.event_store(config.scope.clone()).with_batch_limit(config.batch_limit);
    let runner = SyncRunner::new(store, db.clone(), db);

    let shutdown = runner.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current contact");
            shutdown.cancel();
        }
    });

    match cli.command.unwrap_or(Commands::Sync { json: false }) {
        Commands::Sync { json } => {
            let report = runner.sync().await.map_err(|e| {
                error!("Sync failed: {}", e);
                anyhow::anyhow!(e.to_safe_string())
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Calendar {}: {} events, {} reminders from {} contact events ({} unparseable)",
                    report.calendar_id,
                    report.events_queued,
                    report.reminders_queued,
                    report.source_events,
                    report.unparseable
                );
                if report.is_partial() {
                    println!(
                        "{} of {} batches failed; {} operations were not applied",
                        report.failed_flushes, report.flushes, report.discarded_operations
                    );
                }
                if report.cancelled {
                    println!("Sync was interrupted before all contacts were processed");
                }
            }
        }
        Commands::Reminder { slot, minutes } => {
            let minutes = parse_minutes(&minutes)?;
            let report = runner
                .update_reminder(slot, minutes)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_safe_string()))?;
            println!(
                "Rewrote reminders for {} events ({} removed, {} added)",
                report.events, report.deleted, report.inserted
            );
            if report.inserts_skipped {
                println!(
                    "{} batches failed while removing old reminders; no new reminders were added",
                    report.failed_flushes
                );
            }
        }
        Commands::Color { argb } => {
            let color = parse_argb(&argb)?;
            let calendar_id = runner
                .update_calendar_color(color)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_safe_string()))?;
            info!("Calendar {} recolored", calendar_id);
            println!("Calendar color set to {:#010X}", color);
        }
    }

    Ok(())
}

fn parse_minutes(value: &str) -> Result<Option<u32>> {
    match value.trim().to_lowercase().as_str() {
        "off" | "none" | "-1" => Ok(None),
        other => other
            .parse::<u32>()
            .map(Some)
            .with_context(|| format!("'{}' is not a number of minutes", value)),
    }
}

fn parse_argb(value: &str) -> Result<i64> {
    let trimmed = value.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .or_else(|| trimmed.strip_prefix('#'));
    let color = match hex {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => trimmed.parse::<u32>(),
    }
    .with_context(|| format!("'{}' is not an ARGB color", value))?;
    Ok(i64::from(color))
}
