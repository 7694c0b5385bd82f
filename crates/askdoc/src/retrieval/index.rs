//! Exact nearest-neighbor index over chunk embeddings

use crate::error::{Error, Result};
use crate::types::Chunk;

/// A retrieved chunk with its similarity to the query
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is better)
    pub similarity: f32,
}

/// Trait for top-k retrieval over indexed chunk vectors
///
/// Callers depend only on this interface (plus a build constructor), so an
/// approximate index can be substituted for [`FlatIndex`] transparently.
pub trait VectorIndex: Send + Sync {
    /// Return up to `k` chunks by descending similarity to `query`
    ///
    /// Ties are broken by ascending chunk position; an empty index yields an
    /// empty result.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>>;

    /// Number of indexed chunks
    fn len(&self) -> usize;

    /// Whether the index holds no chunks
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Embedding dimensions the index was built with
    fn dimensions(&self) -> usize;
}

struct IndexEntry {
    chunk: Chunk,
    /// L2-normalized embedding, so inner product equals cosine similarity
    vector: Vec<f32>,
}

/// Brute-force index: exact inner-product scan over normalized vectors
///
/// Fine at single-document scale; a few hundred chunks scan in microseconds.
pub struct FlatIndex {
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl FlatIndex {
    /// Build a fresh index from embedded chunks
    ///
    /// Every vector must have the declared dimension; a mismatch means the
    /// embedding model broke its contract, and the build is abandoned.
    pub fn build(chunks_with_vectors: Vec<(Chunk, Vec<f32>)>, dimensions: usize) -> Result<Self> {
        let mut entries = Vec::with_capacity(chunks_with_vectors.len());

        for (chunk, vector) in chunks_with_vectors {
            if vector.len() != dimensions {
                return Err(Error::model_unavailable(format!(
                    "embedding for chunk {} has {} dimensions, index expects {}",
                    chunk.id,
                    vector.len(),
                    dimensions
                )));
            }
            entries.push(IndexEntry {
                chunk,
                vector: l2_normalize(vector),
            });
        }

        Ok(Self {
            dimensions,
            entries,
        })
    }

    /// Look up a chunk by its position, for context-window expansion
    pub fn get(&self, position: u32) -> Option<&Chunk> {
        self.entries
            .iter()
            .map(|e| &e.chunk)
            .find(|c| c.position == position)
    }
}

impl VectorIndex for FlatIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if query.len() != self.dimensions {
            return Err(Error::model_unavailable(format!(
                "query embedding has {} dimensions, index expects {}",
                query.len(),
                self.dimensions
            )));
        }
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let query = l2_normalize(query.to_vec());
        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                similarity: dot(&query, &entry.vector),
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then(a.chunk.position.cmp(&b.chunk.position))
        });
        results.truncate(k);

        Ok(results)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }
    vector
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
