//! Core error types for boozetrack-core.
//!
//! This module defines the error hierarchy using thiserror. Catalog failures
//! are fatal at startup; database failures propagate verbatim out of the
//! challenge engine with no retry.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for boozetrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Template catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

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

/// Template-catalog errors.
///
/// `LoadFailed` is a startup precondition failure: the process cannot serve
/// challenge requests without a catalog. `TemplateNotFound` is
/// programming-error-class -- a well-formed catalog makes it unreachable.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog source is missing or unreadable
    #[error("Failed to load challenge catalog from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// The catalog source is not valid JSON or violates the template schema
    #[error("Failed to parse challenge catalog: {0}")]
    ParseFailed(String),

    /// A challenge instance referenced a template id the catalog doesn't have
    #[error("Unknown challenge template id: {0}")]
    TemplateNotFound(u32),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
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

    /// No user row with the given id
    #[error("No such user: {0}")]
    UserNotFound(i64),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
