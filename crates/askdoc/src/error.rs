//! Error types for the question-answering pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
///
/// Every variant is terminal for the call that raised it; there is no retry
/// inside the pipeline. A caller may re-invoke `ingest` with corrected input.
#[derive(Debug, Error)]
pub enum Error {
    /// The uploaded file's format is not one we can extract text from
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The file matched a supported format but could not be decoded
    #[error("Failed to read '{filename}': {message}")]
    CorruptFile { filename: String, message: String },

    /// Degenerate or contradictory configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The embedding or answer model could not be reached or misbehaved
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// `ask` was called before any document was ingested
    #[error("No document has been ingested yet")]
    NotReady,
}

impl Error {
    /// Create a corrupt file error
    pub fn corrupt_file(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorruptFile {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat(message.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Create a model unavailable error
    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable(message.into())
    }
}
