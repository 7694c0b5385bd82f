//! Answer and ingestion report types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::DocumentFormat;

/// Fixed text returned when nothing could be extracted
pub const NO_ANSWER_TEXT: &str =
    "I couldn't find relevant information in the document to answer this question.";

/// An extracted answer to a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The extracted answer span (or the no-answer sentinel text)
    pub text: String,
    /// Extraction confidence (0.0-1.0)
    pub confidence: f32,
    /// Chunk the winning span was drawn from; `None` only for the sentinel
    pub source_chunk_id: Option<u32>,
}

impl Answer {
    /// The "no answer found" sentinel
    pub fn not_found() -> Self {
        Self {
            text: NO_ANSWER_TEXT.to_string(),
            confidence: 0.0,
            source_chunk_id: None,
        }
    }

    /// Whether this is the no-answer sentinel
    pub fn is_no_answer(&self) -> bool {
        self.source_chunk_id.is_none()
    }
}

/// Summary returned after a successful ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Document ID
    pub document_id: Uuid,
    /// Filename as uploaded
    pub filename: String,
    /// Detected format
    pub format: DocumentFormat,
    /// Number of chunks indexed
    pub chunks_indexed: usize,
    /// Extracted text length in characters
    pub characters: usize,
    /// Number of pages (PDF only)
    pub total_pages: Option<u32>,
    /// SHA-256 hash of the extracted text
    pub content_hash: String,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}
