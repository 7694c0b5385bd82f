//! Deterministic offline providers
//!
//! `HashingEmbedder` and `LexicalAnswerModel` stand in for pretrained models
//! when none is reachable: both are pure functions of their input, which also
//! makes them the backbone of the test suite.

use std::collections::HashSet;
use std::hash::Hasher;

use async_trait::async_trait;
use twox_hash::XxHash64;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;

use super::answer_model::{AnswerModel, AnswerSpan};
use super::embedding::EmbeddingProvider;

/// Words carrying no retrieval signal, filtered out of question keywords
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "being", "by", "did", "do", "does", "for",
    "from", "how", "in", "is", "it", "its", "not", "of", "on", "or", "that", "the", "these",
    "this", "those", "to", "was", "were", "what", "when", "where", "which", "who", "whom",
    "whose", "why", "with",
];

/// Lowercased alphanumeric tokens with their byte spans
fn tokens_with_spans(text: &str) -> Vec<(usize, usize, String)> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        if ch.is_alphanumeric() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            tokens.push((s, i, text[s..i].to_lowercase()));
        }
    }
    if let Some(s) = start {
        tokens.push((s, text.len(), text[s..].to_lowercase()));
    }

    tokens
}

fn tokens(text: &str) -> Vec<String> {
    tokens_with_spans(text)
        .into_iter()
        .map(|(_, _, t)| t)
        .collect()
}

/// Offline feature-hashing embedder
///
/// Each token is hashed with a seeded XxHash64 into one of `dimensions`
/// signed buckets; the bucket counts are L2-normalized. Texts sharing
/// vocabulary land near each other under inner product, which is enough
/// signal for single-document retrieval.
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    /// Create an embedder producing vectors of the given dimension
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in tokens(text) {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.as_bytes());
            let hash = hasher.finish();

            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

/// Keyword-overlap extractive answer model
///
/// Scores each sentence of the context by how many question content-words it
/// contains, then returns the longest run of words in the winning sentence
/// that do not appear in the question. For "What is the capital of France?"
/// against "The capital of France is Paris." that run is "Paris".
pub struct LexicalAnswerModel {
    stopwords: HashSet<&'static str>,
}

impl LexicalAnswerModel {
    /// Create a new lexical answer model
    pub fn new() -> Self {
        Self {
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Question keywords: unique tokens longer than two characters that are
    /// not stopwords; falls back to all tokens for stopword-only questions
    fn content_words(&self, question_tokens: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut words: Vec<String> = question_tokens
            .iter()
            .filter(|t| t.len() > 2 && !self.stopwords.contains(t.as_str()))
            .filter(|t| seen.insert(t.as_str().to_string()))
            .cloned()
            .collect();

        if words.is_empty() {
            let mut seen = HashSet::new();
            words = question_tokens
                .iter()
                .filter(|t| seen.insert(t.as_str().to_string()))
                .cloned()
                .collect();
        }

        words
    }

    /// Pick the span of the best sentence that is not part of the question
    fn span_within(
        sentence_offset: usize,
        sentence: &str,
        question_set: &HashSet<&str>,
    ) -> (usize, usize) {
        let toks = tokens_with_spans(sentence);

        // maximal runs of tokens absent from the question; prefer the longest,
        // and the latest on ties (answers tend to follow the copula)
        let mut best: Option<(usize, usize, usize)> = None; // (len, start_tok, end_tok)
        let mut run_start: Option<usize> = None;

        for (i, (_, _, tok)) in toks.iter().enumerate() {
            if question_set.contains(tok.as_str()) {
                if let Some(s) = run_start.take() {
                    let len = i - s;
                    if best.map_or(true, |(l, _, _)| len >= l) {
                        best = Some((len, s, i - 1));
                    }
                }
            } else if run_start.is_none() {
                run_start = Some(i);
            }
        }
        if let Some(s) = run_start {
            let len = toks.len() - s;
            if best.map_or(true, |(l, _, _)| len >= l) {
                best = Some((len, s, toks.len() - 1));
            }
        }

        match best {
            Some((_, first, last)) => (
                sentence_offset + toks[first].0,
                sentence_offset + toks[last].1,
            ),
            // every word also appears in the question: answer with the sentence
            None => (sentence_offset, sentence_offset + sentence.len()),
        }
    }
}

impl Default for LexicalAnswerModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerModel for LexicalAnswerModel {
    async fn extract(&self, question: &str, context: &str) -> Result<AnswerSpan> {
        let question_tokens = tokens(question);
        if question_tokens.is_empty() || context.is_empty() {
            return Ok(AnswerSpan::empty());
        }

        let content_words = self.content_words(&question_tokens);
        let question_phrase = content_words.join(" ");
        let question_set: HashSet<&str> = question_tokens.iter().map(String::as_str).collect();

        // (score, has extractable words, offset, sentence, matched count)
        let mut best: Option<(usize, bool, usize, &str, usize)> = None;

        for (offset, sentence) in context.split_sentence_bound_indices() {
            let sentence_tokens = tokens(sentence);
            let token_set: HashSet<&str> = sentence_tokens.iter().map(String::as_str).collect();
            let matched = content_words
                .iter()
                .filter(|w| token_set.contains(w.as_str()))
                .count();

            let mut score = matched;
            if matched > 1 && sentence.to_lowercase().contains(&question_phrase) {
                score += 2;
            }
            if score == 0 {
                continue;
            }

            // a sentence that merely restates the question has nothing to extract
            let has_answer_words = sentence_tokens
                .iter()
                .any(|t| !question_set.contains(t.as_str()));

            let better = match &best {
                None => true,
                Some((s, r, ..)) => score > *s || (score == *s && has_answer_words && !r),
            };
            if better {
                best = Some((score, has_answer_words, offset, sentence, matched));
            }
        }

        let Some((_, _, offset, sentence, matched)) = best else {
            return Ok(AnswerSpan::empty());
        };

        let score = (matched as f32 / content_words.len() as f32).clamp(0.0, 1.0);
        let (start, end) = Self::span_within(offset, sentence, &question_set);

        Ok(AnswerSpan { start, end, score })
    }

    fn name(&self) -> &str {
        "lexical"
    }
}
