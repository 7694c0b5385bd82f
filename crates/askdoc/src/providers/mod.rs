//! Model provider traits and implementations
//!
//! The embedding and answer models are injected capabilities: the pipeline
//! depends only on the traits here, so tests and offline deployments can
//! substitute the deterministic implementations in [`lexical`].

mod answer_model;
mod embedding;
pub mod lexical;
pub mod ollama;

pub use answer_model::{AnswerModel, AnswerSpan};
pub use embedding::EmbeddingProvider;
pub use lexical::{HashingEmbedder, LexicalAnswerModel};
pub use ollama::OllamaEmbedder;
