//! Assembles retrieved chunks into a context and extracts an answer span

use std::sync::Arc;

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::providers::AnswerModel;
use crate::retrieval::SearchResult;
use crate::types::Answer;

/// Byte range a chunk occupies in the assembled context
struct ContextSegment {
    chunk_id: u32,
    start: usize,
    end: usize,
}

/// Turns retrieved chunks plus a question into an [`Answer`]
///
/// Chunks are kept highest-similarity-first under the context budget, then
/// reordered by document position before concatenation so the answer model
/// sees coherent running text.
pub struct AnswerExtractor {
    model: Arc<dyn AnswerModel>,
    config: ExtractionConfig,
}

impl AnswerExtractor {
    /// Create an extractor around an answer model
    pub fn new(model: Arc<dyn AnswerModel>, config: ExtractionConfig) -> Self {
        Self { model, config }
    }

    /// Name of the underlying answer model
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Extract an answer for `question` from the retrieved chunks
    ///
    /// Empty retrieval, or a model span that is empty or out of bounds,
    /// yields the no-answer sentinel rather than an error. Low confidence is
    /// reported as-is; interpreting it is the caller's policy.
    pub async fn answer(&self, question: &str, retrieved: &[SearchResult]) -> Result<Answer> {
        if retrieved.is_empty() {
            return Ok(Answer::not_found());
        }

        let (context, segments) = self.assemble_context(retrieved);
        if context.is_empty() {
            return Ok(Answer::not_found());
        }

        let span = self.model.extract(question, &context).await?;

        if span.start >= span.end
            || span.end > context.len()
            || !context.is_char_boundary(span.start)
            || !context.is_char_boundary(span.end)
        {
            return Ok(Answer::not_found());
        }

        let text = context[span.start..span.end].trim().to_string();
        if text.is_empty() {
            return Ok(Answer::not_found());
        }

        let source_chunk_id = segments
            .iter()
            .find(|s| span.start >= s.start && span.start < s.end)
            .map(|s| s.chunk_id);

        let confidence = span.score.clamp(0.0, 1.0);
        if confidence < self.config.min_confidence {
            tracing::debug!(confidence, "answer below confidence threshold");
        }

        Ok(Answer {
            text,
            confidence,
            source_chunk_id,
        })
    }

    /// Concatenate retrieved chunks within the context budget
    ///
    /// Input arrives in descending similarity order; chunks are dropped from
    /// the tail (lowest similarity first) until the budget fits, though the
    /// top chunk is always kept. The survivors are reordered by position.
    fn assemble_context(&self, retrieved: &[SearchResult]) -> (String, Vec<ContextSegment>) {
        let mut kept: Vec<&SearchResult> = retrieved.iter().collect();
        let mut total: usize = kept
            .iter()
            .map(|r| r.chunk.text.chars().count())
            .sum();

        while kept.len() > 1 && total > self.config.max_context_chars {
            if let Some(dropped) = kept.pop() {
                total -= dropped.chunk.text.chars().count();
                tracing::debug!(
                    chunk = dropped.chunk.id,
                    similarity = dropped.similarity,
                    "chunk dropped from context budget"
                );
            }
        }

        kept.sort_by_key(|r| r.chunk.position);

        let mut context = String::new();
        let mut segments = Vec::with_capacity(kept.len());

        for result in kept {
            if result.chunk.text.is_empty() {
                continue;
            }
            if !context.is_empty() {
                context.push('\n');
            }
            let start = context.len();
            context.push_str(&result.chunk.text);
            segments.push(ContextSegment {
                chunk_id: result.chunk.id,
                start,
                end: context.len(),
            });
        }

        (context, segments)
    }
}
