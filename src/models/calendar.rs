// file: src/models/calendar.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The (account name, account type) pair attached to every event-store
/// request. Only rows carrying this pair are ever read or written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountScope {
    pub account_name: String,
    pub account_type: String,
}

impl AccountScope {
    pub fn new(account_name: &str, account_type: &str) -> Self {
        Self {
            account_name: account_name.to_string(),
            account_type: account_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    Read,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Read => "read",
        }
    }
}

/// Internal name of the managed calendar row.
pub const MANAGED_CALENDAR_NAME: &str = "birthday_sync";

/// Everything needed to create the managed calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSpec {
    pub scope: AccountScope,
    pub name: String,
    pub display_name: String,
    pub color: i64,
    pub access_level: AccessLevel,
    pub owner_account: String,
    pub sync_events: bool,
    pub visible: bool,
}

impl CalendarSpec {
    /// Read-only, visible, synced calendar owned by the sync account.
    pub fn managed(scope: &AccountScope, display_name: &str, color: i64) -> Self {
        Self {
            scope: scope.clone(),
            name: MANAGED_CALENDAR_NAME.to_string(),
            display_name: display_name.to_string(),
            color,
            access_level: AccessLevel::Read,
            owner_account: scope.account_name.clone(),
            sync_events: true,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ManagedCalendar {
    pub id: i64,
    pub account_name: String,
    pub account_type: String,
    pub name: String,
    pub display_name: String,
    pub color: i64,
    pub access_level: String,
    pub owner_account: String,
    pub sync_events: bool,
    pub visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_calendar_spec() {
        let scope = AccountScope::new("Birthday Sync", "org.birthdaysync.account");
        let spec = CalendarSpec::managed(&scope, "Birthdays", 0xFF1976D2);

        assert_eq!(spec.access_level, AccessLevel::Read);
        assert_eq!(spec.owner_account, "Birthday Sync");
        assert!(spec.sync_events);
        assert!(spec.visible);
        assert_eq!(spec.name, MANAGED_CALENDAR_NAME);
    }
}
