//! askdoc: single-document retrieval-augmented question answering
//!
//! Ingest one uploaded document (plain text, PDF, or Word), split it into
//! overlapping chunks, index chunk embeddings for cosine-similarity search,
//! and answer natural-language questions by retrieving the most relevant
//! chunks and extracting an answer span from them.
//!
//! The embedding and answer models are injected behind traits, so tests and
//! offline deployments can run entirely on the deterministic local
//! implementations in [`providers::lexical`].

pub mod config;
pub mod error;
pub mod extraction;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::RagPipeline;
pub use types::{Answer, Chunk, Document, DocumentFormat, IngestReport};
