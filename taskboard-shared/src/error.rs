//! Error types shared by the relational side of Taskboard.
//!
//! Not-found conditions are not errors here: catalog operations report "no
//! match" through `Option`, `bool` or an empty `Vec`.

use thiserror::Error;

/// SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Result type alias for Taskboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for configuration, database and seeding failures
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unparsable configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connectivity, authentication or statement failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Input rejected before reaching the database
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Seeder could not produce data (e.g. nothing to assign tasks to)
    #[error("Seed error: {0}")]
    Seed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true when the error is a duplicate key on a unique constraint
    /// (`users.email`, `status.name`).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("POSTGRES_PORT must be a number".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: POSTGRES_PORT must be a number"
        );

        let err = Error::Seed("no statuses".to_string());
        assert_eq!(err.to_string(), "Seed error: no statuses");
    }

    #[test]
    fn test_non_database_errors_are_not_unique_violations() {
        let err = Error::Seed("no users".to_string());
        assert!(!err.is_unique_violation());

        let err = Error::Database(sqlx::Error::RowNotFound);
        assert!(!err.is_unique_violation());
    }
}
