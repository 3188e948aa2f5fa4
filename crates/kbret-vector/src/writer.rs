use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use kbret_core::error::{Error, Result};
use kbret_core::traits::TextEncoder;
use kbret_core::types::Document;

use crate::index::EmbeddingIndex;
use crate::schema::{write_metadata, write_vectors};

pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Embed every document and pair each vector with its `{source, summary}`.
///
/// Rows follow the order of `documents`, which should be a store snapshot so
/// that embedding rows and keyword order agree. A document whose raw text is
/// blank is embedded through its summary.
pub fn build_index(documents: &[Document], encoder: &dyn TextEncoder, batch_size: usize) -> Result<EmbeddingIndex> {
    if documents.is_empty() {
        return Err(Error::EmptyIndex);
    }
    let batch_size = batch_size.max(1);
    tracing::info!(documents = documents.len(), encoder = encoder.name(), batch_size, "building embedding index");

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} docs ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(documents.len());
    for batch in documents.chunks(batch_size) {
        let texts: Vec<String> = batch
            .iter()
            .map(|d| if d.raw_text.trim().is_empty() { d.summary.clone() } else { d.raw_text.clone() })
            .collect();
        let embedded = encoder.encode_batch(&texts).map_err(|e| Error::Encoder(format!("{:#}", e)))?;
        if embedded.len() != batch.len() {
            pb.abandon_with_message("batch size mismatch");
            return Err(Error::CountMismatch { vectors: embedded.len(), metadata: batch.len() });
        }
        vectors.extend(embedded);
        pb.inc(batch.len() as u64);
    }
    pb.finish_with_message("embedding complete");

    let metadata = documents.iter().map(Document::meta).collect();
    EmbeddingIndex::from_parts(vectors, metadata)
}

/// Persist both stores. The vector store is written first; a crash between
/// the two writes leaves stores whose counts may disagree, which the loader
/// rejects.
pub fn write_index(index: &EmbeddingIndex, vector_store: &Path, metadata_store: &Path) -> Result<()> {
    write_vectors(vector_store, index.vectors())?;
    write_metadata(metadata_store, index.metadata())?;
    tracing::info!(
        rows = index.vector_count(),
        dim = index.dim(),
        vectors = %vector_store.display(),
        metadata = %metadata_store.display(),
        "embedding index written"
    );
    Ok(())
}
