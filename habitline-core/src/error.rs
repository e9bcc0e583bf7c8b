//! Error types for habitline-core

use thiserror::Error;

/// Main error type for the habitline-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Periodicity value other than "daily" or "weekly"
    #[error("periodicity must be 'daily' or 'weekly', got '{0}'")]
    InvalidPeriodicity(String),

    /// Habit not found in the registry
    #[error("habit not found: {0}")]
    HabitNotFound(String),
}

/// Result type alias for habitline-core
pub type Result<T> = std::result::Result<T, Error>;
