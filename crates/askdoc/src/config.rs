//! Configuration for the question-answering pipeline

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Answer extraction configuration
    pub extraction: ExtractionConfig,
}

impl RagConfig {
    /// Reject degenerate parameter combinations up front
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size <= self.chunking.overlap {
            return Err(Error::invalid_configuration(format!(
                "chunk_size ({}) must be greater than overlap ({})",
                self.chunking.chunk_size, self.chunking.overlap
            )));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::invalid_configuration(
                "embedding dimensions must be positive",
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::invalid_configuration("top_k must be positive"));
        }
        if self.extraction.max_context_chars == 0 {
            return Err(Error::invalid_configuration(
                "max_context_chars must be positive",
            ));
        }
        Ok(())
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub overlap: usize,
    /// Pull chunk ends back to the nearest whitespace instead of cutting mid-word
    pub snap_to_whitespace: bool,
    /// How far back from the target boundary to look for whitespace
    pub snap_window: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
            snap_to_whitespace: true,
            snap_window: 32,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name (Ollama model tag when the Ollama embedder is used)
    pub model: String,
    /// Embedding dimensions (384 for all-minilm, 768 for larger models)
    pub dimensions: usize,
    /// Ollama base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "all-minilm".to_string(),
            dimensions: 384,
            base_url: "http://localhost:11434".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per question
    pub top_k: usize,
    /// Also pull in position-adjacent neighbors of each retrieved chunk
    pub expand_context: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            expand_context: false,
        }
    }
}

/// Answer extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum total context length in characters passed to the answer model
    pub max_context_chars: usize,
    /// Answers scoring below this are flagged as low-confidence by shells
    pub min_confidence: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_context_chars: 2000,
            min_confidence: 0.1,
        }
    }
}
