use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Calendar creation failed: {0}")]
    CalendarCreation(String),

    #[error("Batch apply failed: {0}")]
    BatchApply(String),

    #[error("Operation {position} references operation {index}, which is not an earlier event insert")]
    InvalidBackReference { index: usize, position: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A sync run is already in progress")]
    SyncInProgress,
}

impl AppError {
    pub fn calendar_creation<S: Into<String>>(msg: S) -> Self {
        Self::CalendarCreation(msg.into())
    }

    pub fn batch_apply<S: Into<String>>(msg: S) -> Self {
        Self::BatchApply(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn is_pii_safe(&self) -> bool {
        match self {
            Self::Database(_) | Self::Anyhow(_) => false,
            Self::CalendarCreation(_)
            | Self::BatchApply(_)
            | Self::InvalidBackReference { .. }
            | Self::InvalidInput(_)
            | Self::Config(_)
            | Self::NotFound(_)
            | Self::SyncInProgress => true,
        }
    }

    pub fn to_safe_string(&self) -> String {
        if self.is_pii_safe() {
            self.to_string()
        } else {
            match self {
                Self::Database(_) => "Database operation failed".to_string(),
                Self::Anyhow(_) => "Operation failed".to_string(),
                _ => self.to_string(),
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_string_hides_driver_details() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.to_safe_string(), "Database operation failed");

        let err = AppError::config("account name must not be empty");
        assert_eq!(
            err.to_safe_string(),
            "Configuration error: account name must not be empty"
        );
    }
}
