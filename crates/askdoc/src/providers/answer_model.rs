//! Extractive answer model trait

use async_trait::async_trait;

use crate::error::Result;

/// A contiguous span selected from an assembled context
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSpan {
    /// Byte offset of the span start in the context
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
    /// Extraction confidence (0.0-1.0)
    pub score: f32,
}

impl AnswerSpan {
    /// A zero-width span signalling that nothing was extractable
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            score: 0.0,
        }
    }
}

/// Trait for extractive question answering over assembled context text
///
/// The model answers by selecting a contiguous span of the existing context,
/// never by generating novel text. `start`/`end` are byte offsets into the
/// `context` argument and must land on character boundaries.
#[async_trait]
pub trait AnswerModel: Send + Sync {
    /// Select the best answer span for `question` within `context`
    async fn extract(&self, question: &str, context: &str) -> Result<AnswerSpan>;

    /// Model name for logging
    fn name(&self) -> &str;
}
