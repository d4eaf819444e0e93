//! Error types for the Ally journal
//!
//! All errors use thiserror for structured error handling.
//! Persistence and validation problems are recovered where they happen;
//! only capability failures (microphone, recognizer, media I/O) are
//! expected to reach a caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Microphone access denied")]
    PermissionDenied,

    #[error("Speech recognizer unavailable: {0}")]
    RecognizerUnavailable(String),

    #[error("Recording error: {0}")]
    Recording(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Media store error: {0}")]
    MediaStore(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Whether this error comes from a device or OS capability and should be
    /// shown to the user as an alert.
    pub fn is_capability(&self) -> bool {
        matches!(
            self,
            AppError::PermissionDenied
                | AppError::RecognizerUnavailable(_)
                | AppError::Recording(_)
                | AppError::Transcription(_)
        )
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
