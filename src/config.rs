//! Process configuration.
//!
//! Everything comes from environment variables with working defaults, so a
//! bare `birthday-sync` run needs no setup. User preferences (reminders,
//! color, language) are not configuration; they live in the settings table.

use crate::database::DEFAULT_BATCH_LIMIT;
use crate::error::{AppError, AppResult};
use crate::models::AccountScope;
use crate::sync::batch::FLUSH_THRESHOLD;
use log::info;
use std::env;
use std::path::PathBuf;

pub const DATABASE_VAR: &str = "BIRTHDAY_SYNC_DATABASE";
pub const ACCOUNT_NAME_VAR: &str = "BIRTHDAY_SYNC_ACCOUNT_NAME";
pub const ACCOUNT_TYPE_VAR: &str = "BIRTHDAY_SYNC_ACCOUNT_TYPE";
pub const BATCH_LIMIT_VAR: &str = "BIRTHDAY_SYNC_BATCH_LIMIT";

pub const DEFAULT_ACCOUNT_NAME: &str = "Birthday Sync";
pub const DEFAULT_ACCOUNT_TYPE: &str = "org.birthdaysync.account";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite URL or plain file path.
    pub database: String,
    pub scope: AccountScope,
    /// Most operations the store accepts in one batch.
    pub batch_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let database = match env::var(DATABASE_VAR) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => default_database_path()?.to_string_lossy().into_owned(),
        };
        let account_name =
            env::var(ACCOUNT_NAME_VAR).unwrap_or_else(|_| DEFAULT_ACCOUNT_NAME.to_string());
        let account_type =
            env::var(ACCOUNT_TYPE_VAR).unwrap_or_else(|_| DEFAULT_ACCOUNT_TYPE.to_string());
        let batch_limit = match env::var(BATCH_LIMIT_VAR) {
            Ok(value) => value.trim().parse::<usize>().map_err(|_| {
                AppError::config(format!(
                    "{} must be a positive integer, got '{}'",
                    BATCH_LIMIT_VAR, value
                ))
            })?,
            Err(_) => DEFAULT_BATCH_LIMIT,
        };

        Ok(Self {
            database,
            scope: AccountScope::new(&account_name, &account_type),
            batch_limit,
        })
    }
}

/// `<data dir>/birthday-sync/birthday-sync.db`
pub fn default_database_path() -> AppResult<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| AppError::config(format!("no data directory; set {}", DATABASE_VAR)))?;
    Ok(base.join("birthday-sync").join("birthday-sync.db"))
}

pub fn validate_config(config: &AppConfig) -> AppResult<()> {
    if config.scope.account_name.trim().is_empty() {
        return Err(AppError::config("account name must not be empty"));
    }
    if config.scope.account_type.trim().is_empty() {
        return Err(AppError::config("account type must not be empty"));
    }
    if config.batch_limit < FLUSH_THRESHOLD {
        return Err(AppError::config(format!(
            "batch limit {} is below the flush size of {}",
            config.batch_limit, FLUSH_THRESHOLD
        )));
    }
    if config.database.trim().is_empty() {
        return Err(AppError::config("database location must not be empty"));
    }

    info!(
        "Configuration OK: account '{}' ({}), batch limit {}",
        config.scope.account_name, config.scope.account_type, config.batch_limit
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [DATABASE_VAR, ACCOUNT_NAME_VAR, ACCOUNT_TYPE_VAR, BATCH_LIMIT_VAR] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = AppConfig::from_env().unwrap();

        assert_eq!(config.scope, AccountScope::new(DEFAULT_ACCOUNT_NAME, DEFAULT_ACCOUNT_TYPE));
        assert_eq!(config.batch_limit, DEFAULT_BATCH_LIMIT);
        assert!(config.database.ends_with("birthday-sync.db"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var(DATABASE_VAR, "sqlite::memory:");
        env::set_var(ACCOUNT_NAME_VAR, "Tester");
        env::set_var(BATCH_LIMIT_VAR, "250");

        let config = AppConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.database, "sqlite::memory:");
        assert_eq!(config.scope.account_name, "Tester");
        assert_eq!(config.scope.account_type, DEFAULT_ACCOUNT_TYPE);
        assert_eq!(config.batch_limit, 250);
    }

    #[test]
    #[serial]
    fn test_bad_batch_limit() {
        clear_env();
        env::set_var(BATCH_LIMIT_VAR, "lots");
        let result = AppConfig::from_env();
        clear_env();

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_validation_rejects_small_limit_and_empty_scope() {
        let config = AppConfig {
            database: "birthdays.db".to_string(),
            scope: AccountScope::new("Birthday Sync", "org.birthdaysync.account"),
            batch_limit: FLUSH_THRESHOLD - 1,
        };
        assert!(validate_config(&config).is_err());

        let config = AppConfig {
            batch_limit: FLUSH_THRESHOLD,
            scope: AccountScope::new("", "org.birthdaysync.account"),
            ..config
        };
        assert!(validate_config(&config).is_err());

        let config = AppConfig {
            scope: AccountScope::new("Birthday Sync", "org.birthdaysync.account"),
            ..config
        };
        assert!(validate_config(&config).is_ok());
    }
}
