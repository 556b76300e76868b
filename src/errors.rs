//! Unified application error type.
//! All modules (db, core, cli, voice) return AppError so that a failed turn
//! can be reported by the loop in one place.

use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Record store
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Unable to process database query: {0}")]
    Query(rusqlite::Error),

    #[error("Ingestion error: {0}")]
    Ingest(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    // ---------------------------
    // Intent decoding
    // ---------------------------
    #[error("Unable to decode intent: {0}")]
    Decode(String),

    // ---------------------------
    // Interpreter bridge
    // ---------------------------
    #[error("Unable to start interpreter: {0}")]
    Startup(String),

    #[error("Interpreter I/O error: {0}")]
    InterpreterIo(String),

    #[error("Interpreter did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Unable to shut down interpreter: {0}")]
    Shutdown(String),

    // ---------------------------
    // Voice collaborators
    // ---------------------------
    #[error("Recording error: {0}")]
    Audio(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Speech error: {0}")]
    Speech(String),

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
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Errors that abort the whole run instead of failing a single turn.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Startup(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
