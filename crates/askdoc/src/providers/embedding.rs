//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for mapping text to fixed-dimension dense vectors
///
/// Implementations:
/// - `OllamaEmbedder`: local Ollama server (all-minilm, nomic-embed-text)
/// - `HashingEmbedder`: offline deterministic feature hashing
///
/// Chunk text at indexing time and query text at ask time go through the
/// same provider, so both live in one embedding space. Implementations must
/// be deterministic: the same input always yields the same vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts (batch)
    ///
    /// Default implementation calls `embed` sequentially; implementations
    /// with native batching should override. Per-item results must match
    /// what `embed` would return.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Embedding dimensions
    fn dimensions(&self) -> usize;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
