//! Unified application error type.
//! All modules (db, core, cli, export) return AppError so that a failed
//! action surfaces as one readable message and a non-zero exit code.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / storage
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing / validation
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid {field}: {msg}")]
    Validation { field: String, msg: String },

    // ---------------------------
    // Business rules
    // ---------------------------
    #[error("{0} not found")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Attendance already marked for user {user_id} in session {session_id}")]
    AlreadyMarked { user_id: String, session_id: String },

    #[error("Device {0} is not available for allocation")]
    DeviceUnavailable(String),

    #[error(
        "You are {distance:.0} m away from the venue; attendance can only be marked within {radius:.0} m"
    )]
    Geofence { distance: f64, radius: f64 },

    #[error("{checklist} for session {session_id} is not open: {reason}")]
    ChecklistClosed {
        checklist: String,
        session_id: String,
        reason: String,
    },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Import / export
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("Import failed:\n{0}")]
    Import(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Shorthand for a field validation failure.
    pub fn invalid(field: &str, msg: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            msg: msg.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
