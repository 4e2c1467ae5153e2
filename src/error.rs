//! Error types for Murmure.

use thiserror::Error;

/// Library-level error type for Murmure operations.
#[derive(Error, Debug)]
pub enum MurmureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audio processing failed: {0}")]
    Audio(String),

    #[error("Container transcode failed: {0}")]
    Transcode(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Refinement failed: {0}")]
    Refinement(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Murmure operations.
pub type Result<T> = std::result::Result<T, MurmureError>;
