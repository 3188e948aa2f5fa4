//! In-memory embedding index: parallel vector and metadata arrays.
//!
//! Row `i` of the vector store and row `i` of the metadata store describe the
//! same document. Any disagreement between the two stores (row counts, ragged
//! vectors) means the rows cannot be trusted, so the whole index is rejected
//! rather than partially used.
use std::path::Path;

use kbret_core::error::{Error, Result};
use kbret_core::types::DocMeta;

use crate::schema::{read_metadata, read_vectors};

#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    vectors: Vec<Vec<f32>>,
    metadata: Vec<DocMeta>,
    dim: usize,
}

impl EmbeddingIndex {
    /// Build an index from already-loaded rows, applying the same checks as
    /// [`EmbeddingIndex::try_load`].
    pub fn from_parts(vectors: Vec<Vec<f32>>, metadata: Vec<DocMeta>) -> Result<Self> {
        if vectors.len() != metadata.len() {
            return Err(Error::CountMismatch { vectors: vectors.len(), metadata: metadata.len() });
        }
        let Some(first) = vectors.first() else {
            return Err(Error::EmptyIndex);
        };
        let dim = first.len();
        if dim == 0 {
            return Err(Error::ZeroDimension);
        }
        if let Some((row, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
            return Err(Error::RaggedVectors { row, expected: dim, found: v.len() });
        }
        Ok(Self { vectors, metadata, dim })
    }

    /// Read both stores and validate them as one unit.
    pub fn try_load(vector_store: &Path, metadata_store: &Path) -> Result<Self> {
        let vectors = read_vectors(vector_store)?;
        let metadata = read_metadata(metadata_store)?;
        Self::from_parts(vectors, metadata)
    }

    /// Like [`EmbeddingIndex::try_load`] but absorbs every failure: the index is
    /// simply absent and callers use keyword retrieval.
    pub fn load(vector_store: &Path, metadata_store: &Path) -> Option<Self> {
        if !vector_store.is_file() || !metadata_store.is_file() {
            tracing::info!(
                vectors = %vector_store.display(),
                metadata = %metadata_store.display(),
                "embedding stores not found; keyword retrieval only"
            );
            return None;
        }
        match Self::try_load(vector_store, metadata_store) {
            Ok(index) => {
                tracing::info!(rows = index.vector_count(), dim = index.dim(), "embedding index loaded");
                Some(index)
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring embedding index; falling back to keyword retrieval");
                None
            }
        }
    }

    pub fn vector_count(&self) -> usize {
        self.vectors.len()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Panics if `row >= vector_count()`.
    pub fn vector_at(&self, row: usize) -> &[f32] {
        &self.vectors[row]
    }

    /// Panics if `row >= vector_count()`.
    pub fn metadata_at(&self, row: usize) -> &DocMeta {
        &self.metadata[row]
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn metadata(&self) -> &[DocMeta] {
        &self.metadata
    }
}
