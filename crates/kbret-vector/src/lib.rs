//! kbret-vector
//!
//! Precomputed embedding index (vector store + metadata store), cosine scoring
//! over it, and the builder that produces both stores from a document set.
pub mod index;
pub mod schema;
pub mod search;
pub mod writer;

pub use index::EmbeddingIndex;
pub use search::{cosine_similarity, EmbeddingScorer, COSINE_EPS};
pub use writer::{build_index, write_index, DEFAULT_BATCH_SIZE};
