//! Document and chunk types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Plain UTF-8 text
    Text,
    /// PDF document
    Pdf,
    /// Word-processor document (.docx)
    Word,
}

impl DocumentFormat {
    /// Detect format from a file extension
    ///
    /// Anything outside the supported set fails before any parsing happens.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "docx" | "doc" => Ok(Self::Word),
            other => Err(Error::unsupported_format(other.to_string())),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Text => "Text File",
            Self::Pdf => "PDF",
            Self::Word => "Word Document",
        }
    }
}

/// An uploaded document awaiting ingestion
///
/// Ephemeral: consumed during `ingest` and never persisted.
#[derive(Debug, Clone)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Filename as uploaded
    pub filename: String,
    /// Declared format
    pub format: DocumentFormat,
    /// Raw file bytes
    pub data: Vec<u8>,
}

impl Document {
    /// Create a document with an explicitly declared format
    pub fn new(filename: impl Into<String>, format: DocumentFormat, data: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            format,
            data,
        }
    }

    /// Create a document, detecting the format from the filename extension
    pub fn from_file_bytes(filename: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let filename = filename.into();
        let extension = filename.rsplit('.').next().unwrap_or("");
        let format = DocumentFormat::from_extension(extension)?;
        Ok(Self::new(filename, format, data))
    }
}

/// A chunk of text from a document, the unit of retrieval
///
/// Immutable once created. `position` is the 0-based ordinal of the chunk in
/// the source text; it doubles as the chunk id and breaks similarity ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID within the active index
    pub id: u32,
    /// Text content
    pub text: String,
    /// Ordinal in the source chunk sequence
    pub position: u32,
}

impl Chunk {
    /// Create a new chunk at the given position
    pub fn new(position: u32, text: String) -> Self {
        Self {
            id: position,
            text,
            position,
        }
    }
}
