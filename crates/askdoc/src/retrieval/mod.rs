//! Vector indexing and nearest-neighbor retrieval

mod index;

pub use index::{FlatIndex, SearchResult, VectorIndex};
