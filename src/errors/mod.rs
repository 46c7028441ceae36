//! Error handling utilities for the moodtab application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use thiserror::Error;

/// Represents specific error cases that can occur during database operations.
///
/// # Examples
///
/// ```
/// use moodtab::errors::DatabaseError;
///
/// let error = DatabaseError::MalformedRecord {
///     date: "2024-03-15".to_string(),
///     reason: "unknown mood 'GRUMPY'".to_string(),
/// };
/// assert!(format!("{}", error).contains("2024-03-15"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}\n\nIf you're seeing 'file is not a database' errors, the database file may be corrupted or in an incompatible format.")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other moodtab instances.")]
    Pool(#[from] r2d2::Error),

    /// A persisted row could not be mapped back to a domain value.
    #[error("Malformed record for '{date}': {reason}")]
    MalformedRecord {
        /// The primary key of the offending row
        date: String,
        /// What could not be parsed
        reason: String,
    },

    /// Custom database error with detailed message.
    #[error("Database error: {0}")]
    Custom(String),
}

/// Represents all possible errors that can occur in the moodtab application.
///
/// Note: This type does not implement `Clone` to avoid losing error context when
/// cloning `std::io::Error` values. The calendar state machine keeps only the
/// rendered message.
///
/// # Examples
///
/// ```
/// use moodtab::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid entry data (unknown mood, bad date, oversized note).
    #[error("Entry error: {0}")]
    Entry(String),

    /// Errors related to database operations.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// The calendar view-model is no longer running or a background task failed.
    #[error("Calendar error: {0}")]
    Calendar(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(DatabaseError::Sqlite(err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Database(DatabaseError::Custom(format!(
            "Storage task failed: {}",
            err
        )))
    }
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use moodtab::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Entry("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
