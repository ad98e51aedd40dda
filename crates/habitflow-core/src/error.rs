//! Core error types for habitflow-core.
//!
//! One umbrella [`CoreError`] plus per-concern enums, all derived with
//! thiserror. Nothing in here is fatal to the process; callers decide
//! how to surface failures.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Reminder scheduling errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Account/session errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Reminder scheduling errors.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Malformed hour/minute input. Rejected synchronously, never clamped.
    #[error("Invalid reminder time {hour:02}:{minute:02} (hour must be 0-23, minute 0-59)")]
    InvalidTime { hour: u32, minute: u32 },

    /// Malformed "HH:MM" string.
    #[error("Cannot parse '{0}' as a reminder time (expected HH:MM)")]
    ParseTime(String),

    /// The timer service refused the registration outright.
    ///
    /// Exact-permission denial is NOT reported here -- the scheduler
    /// degrades to an inexact registration and continues.
    #[error("Timer service rejected registration for habit {habit_id}: {message}")]
    RegistrationRejected { habit_id: i64, message: String },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Row not found
    #[error("No {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Account and session errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Email already registered (matched case-insensitively)
    #[error("An account already exists for {0}")]
    EmailTaken(String),

    /// Wrong email or password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No user is currently logged in
    #[error("Not logged in")]
    NotLoggedIn,

    /// No such user
    #[error("No account found for {0}")]
    UnknownUser(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Empty input where a value is required
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
