//! Error types for redub.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DubError {
    // Extraction errors
    #[error("Audio extraction failed: {message}")]
    Extraction { message: String },

    // Transcription errors
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    #[error("Speech service returned no recognized text")]
    EmptyResult,

    // Translation errors
    #[error("Translation failed: {message}")]
    Translation { message: String },

    #[error("Unsupported target language: {code}")]
    UnsupportedLanguage { code: String },

    // Synthesis errors
    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    // Merge errors
    #[error("Merge failed: {message}")]
    Merge { message: String },

    // External tool errors
    #[error("External tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("Command failed: {message}")]
    CommandFailed { message: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DubError>;
