//! Error handling for stemmix.

use thiserror::Error;

/// Result type alias for stemmix operations
pub type Result<T> = std::result::Result<T, MixError>;

/// Main error type for stemmix operations
#[derive(Error, Debug)]
pub enum MixError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to decode '{name}': {reason}")]
    DecodeFailed { name: String, reason: String },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // Session Errors
    #[error("No stems decoded successfully; nothing to mix")]
    NothingToMix,

    #[error("Track index {index} out of range ({count} tracks)")]
    TrackOutOfRange { index: usize, count: usize },

    // Parameter Errors
    #[error("Invalid parameter '{param}': {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MixError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            MixError::FileNotFound { .. } => "FILE_NOT_FOUND",
            MixError::DecodeFailed { .. } => "DECODE_FAILED",
            MixError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            MixError::NothingToMix => "NOTHING_TO_MIX",
            MixError::TrackOutOfRange { .. } => "TRACK_OUT_OF_RANGE",
            MixError::InvalidParameter { .. } => "INVALID_PARAMETER",
            MixError::Io(_) => "IO_ERROR",
            MixError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable (the session can keep going)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MixError::FileNotFound { .. }
                | MixError::DecodeFailed { .. }
                | MixError::UnsupportedFormat { .. }
                | MixError::InvalidParameter { .. }
        )
    }
}
