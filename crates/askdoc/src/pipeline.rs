//! Pipeline orchestration: ingest a document, answer questions about it
//!
//! A [`RagPipeline`] is an explicit session object owned by the caller, not
//! process-wide state. Concurrent sessions each own their own pipeline.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::extraction::AnswerExtractor;
use crate::ingestion::{TextChunker, TextExtractor};
use crate::providers::{
    AnswerModel, EmbeddingProvider, HashingEmbedder, LexicalAnswerModel,
};
use crate::retrieval::{FlatIndex, SearchResult, VectorIndex};
use crate::types::{Answer, Chunk, Document, IngestReport};

/// Retrieval-augmented question answering over a single ingested document
///
/// Two states: empty (no document ingested, `ask` fails with `NotReady`) and
/// ready (index built). `ingest` rebuilds the index from scratch and swaps it
/// in atomically; a failed ingest leaves the previous index untouched.
pub struct RagPipeline {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    extractor: AnswerExtractor,
    index: Option<FlatIndex>,
}

impl RagPipeline {
    /// Create a pipeline around injected embedding and answer models
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        answer_model: Arc<dyn AnswerModel>,
    ) -> Result<Self> {
        config.validate()?;

        let extractor = AnswerExtractor::new(answer_model, config.extraction.clone());
        Ok(Self {
            config,
            embedder,
            extractor,
            index: None,
        })
    }

    /// Create a pipeline wired to the deterministic offline models
    pub fn with_local_models(config: RagConfig) -> Result<Self> {
        let dimensions = config.embeddings.dimensions;
        Self::new(
            config,
            Arc::new(HashingEmbedder::new(dimensions)),
            Arc::new(LexicalAnswerModel::new()),
        )
    }

    /// Whether a document has been ingested
    pub fn is_ready(&self) -> bool {
        self.index.is_some()
    }

    /// Ingest a document: extract, chunk, embed, and index its text
    ///
    /// Replaces any previously active index, but only after every step has
    /// succeeded — on error the pipeline keeps answering from the prior
    /// document. A document with no extractable text indexes zero chunks and
    /// still moves the pipeline to ready.
    pub async fn ingest(&mut self, document: &Document) -> Result<IngestReport> {
        tracing::info!(
            filename = %document.filename,
            format = document.format.display_name(),
            "ingesting document"
        );

        let extracted = TextExtractor::extract(document)?;
        let chunker = TextChunker::new(&self.config.chunking)?;
        let chunks = chunker.chunk(&extracted.content);
        tracing::debug!(chunks = chunks.len(), "document chunked");

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(Error::model_unavailable(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        let entries: Vec<(Chunk, Vec<f32>)> = chunks.into_iter().zip(vectors).collect();

        let index = FlatIndex::build(entries, self.embedder.dimensions())?;

        let report = IngestReport {
            document_id: document.id,
            filename: document.filename.clone(),
            format: document.format,
            chunks_indexed: index.len(),
            characters: extracted.content.chars().count(),
            total_pages: extracted.total_pages,
            content_hash: TextExtractor::content_hash(&extracted.content),
            ingested_at: Utc::now(),
        };

        // the swap happens last, so readers only ever see a complete index
        self.index = Some(index);
        tracing::info!(chunks = report.chunks_indexed, "index ready");

        Ok(report)
    }

    /// Answer a question from the ingested document
    ///
    /// Fails with `NotReady` until a document has been ingested. An empty
    /// index (empty document) yields the no-answer sentinel, not an error.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let index = self.index.as_ref().ok_or(Error::NotReady)?;

        let query_vector = self.embedder.embed(question).await?;
        let mut retrieved = index.search(&query_vector, self.config.retrieval.top_k)?;
        tracing::debug!(retrieved = retrieved.len(), "chunks retrieved");

        if self.config.retrieval.expand_context {
            retrieved = Self::expand_neighbors(index, retrieved);
        }

        self.extractor.answer(question, &retrieved).await
    }

    /// Pull in position-adjacent neighbors of each retrieved chunk
    ///
    /// Neighbors enter with similarity 0.0 so the context budget drops them
    /// before any chunk retrieval actually scored.
    fn expand_neighbors(index: &FlatIndex, retrieved: Vec<SearchResult>) -> Vec<SearchResult> {
        let mut seen: HashSet<u32> = retrieved.iter().map(|r| r.chunk.position).collect();
        let mut expanded = retrieved.clone();

        for result in &retrieved {
            let position = result.chunk.position;
            let neighbors = [position.checked_sub(1), position.checked_add(1)];
            for neighbor in neighbors.into_iter().flatten() {
                if seen.insert(neighbor) {
                    if let Some(chunk) = index.get(neighbor) {
                        expanded.push(SearchResult {
                            chunk: chunk.clone(),
                            similarity: 0.0,
                        });
                    }
                }
            }
        }

        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentFormat;

    fn pipeline() -> RagPipeline {
        RagPipeline::with_local_models(RagConfig::default()).unwrap()
    }

    fn text_document(content: &str) -> Document {
        Document::new("doc.txt", DocumentFormat::Text, content.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_ask_before_ingest_is_not_ready() {
        let pipeline = pipeline();
        assert!(!pipeline.is_ready());
        assert!(matches!(
            pipeline.ask("anything?").await,
            Err(Error::NotReady)
        ));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_at_construction() {
        let mut config = RagConfig::default();
        config.chunking.overlap = config.chunking.chunk_size;
        assert!(matches!(
            RagPipeline::with_local_models(config),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_ingest_preserves_prior_index() {
        let mut pipeline = pipeline();
        pipeline
            .ingest(&text_document("The capital of France is Paris."))
            .await
            .unwrap();

        let corrupt = Document::new("bad.txt", DocumentFormat::Text, vec![0xff, 0xfe]);
        assert!(pipeline.ingest(&corrupt).await.is_err());

        // prior document still answers
        let answer = pipeline
            .ask("What is the capital of France?")
            .await
            .unwrap();
        assert_eq!(answer.text, "Paris");
    }

    #[tokio::test]
    async fn test_neighbor_expansion_adds_adjacent_chunks() {
        let mut config = RagConfig::default();
        config.chunking.chunk_size = 40;
        config.chunking.overlap = 10;
        config.retrieval.top_k = 1;
        config.retrieval.expand_context = true;

        let mut pipeline = RagPipeline::with_local_models(config).unwrap();
        let text = "alpha beta gamma delta. ".repeat(12);
        pipeline.ingest(&text_document(&text)).await.unwrap();

        let index = pipeline.index.as_ref().unwrap();
        let retrieved = index
            .search(&pipeline.embedder.embed("alpha beta").await.unwrap(), 1)
            .unwrap();
        let expanded = RagPipeline::expand_neighbors(index, retrieved.clone());

        assert!(expanded.len() > retrieved.len());
        assert!(expanded[retrieved.len()..]
            .iter()
            .all(|r| r.similarity == 0.0));
    }
}
