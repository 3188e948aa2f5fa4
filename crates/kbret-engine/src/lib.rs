//! kbret-engine
//!
//! `RetrievalEngine` decides, per call, whether the embedding index can answer
//! a query and otherwise falls back to keyword scoring over the document store.
//! All shared state is held as immutable `Arc` snapshots, so `retrieve` can run
//! from many threads while `refresh`/`reload_index` publish new snapshots.
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use kbret_core::config::Settings;
use kbret_core::traits::{Retriever, TextEncoder};
use kbret_core::types::{RetrievedDoc, SourceKind};
use kbret_core::DocumentStore;
use kbret_embed::{select_encoder, DeadlineEncoder};
use kbret_text::KeywordScorer;
use kbret_vector::{EmbeddingIndex, EmbeddingScorer};

struct IndexFiles {
    vectors: PathBuf,
    metadata: PathBuf,
}

pub struct RetrievalEngine {
    store: DocumentStore,
    index: RwLock<Option<Arc<EmbeddingIndex>>>,
    index_files: Option<IndexFiles>,
    encoder: Option<Arc<dyn TextEncoder>>,
    keyword: KeywordScorer,
    embedding: EmbeddingScorer,
}

impl RetrievalEngine {
    /// Keyword-only engine over `store`.
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            index: RwLock::new(None),
            index_files: None,
            encoder: None,
            keyword: KeywordScorer::new(),
            embedding: EmbeddingScorer::new(),
        }
    }

    /// Wire documents, stores and encoder from configuration. Never fails:
    /// anything missing just narrows the engine to keyword retrieval.
    pub fn from_settings(settings: &Settings) -> Self {
        let data = &settings.data;
        let mut engine = Self::new(DocumentStore::open(data.docs_path()))
            .with_index_files(data.embeddings_file(), data.metadata_file());
        if let Some(encoder) = select_encoder(&settings.encoder) {
            engine = engine.with_encoder(encoder, settings.encoder.timeout());
        }
        engine
    }

    /// Use an already-built index (or explicitly none).
    pub fn with_index(self, index: Option<EmbeddingIndex>) -> Self {
        *self.index.write() = index.map(Arc::new);
        self
    }

    /// Load the index from its two stores now, and remember them for
    /// [`RetrievalEngine::reload_index`].
    pub fn with_index_files(mut self, vectors: impl Into<PathBuf>, metadata: impl Into<PathBuf>) -> Self {
        self.index_files = Some(IndexFiles { vectors: vectors.into(), metadata: metadata.into() });
        self.reload_index();
        self
    }

    /// Query encoder. With a `timeout`, each query encoding is abandoned after
    /// that long and the call falls back to keyword scoring.
    pub fn with_encoder(mut self, encoder: Arc<dyn TextEncoder>, timeout: Option<Duration>) -> Self {
        self.encoder = Some(match timeout {
            Some(t) => Arc::new(DeadlineEncoder::new(encoder, t)),
            None => encoder,
        });
        self
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn index(&self) -> Option<Arc<EmbeddingIndex>> {
        self.index.read().as_ref().map(Arc::clone)
    }

    pub fn has_encoder(&self) -> bool {
        self.encoder.is_some()
    }

    /// Top `top_k` documents for `query`, best first. Never fails; an empty
    /// store gives an empty list and `top_k == 0` gives nothing.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<RetrievedDoc> {
        if top_k == 0 {
            return Vec::new();
        }
        if let Some(hits) = self.embedding_retrieve(query, top_k) {
            tracing::debug!(hits = hits.len(), "answered from embedding index");
            return hits;
        }
        let hits = self.keyword_retrieve(query, top_k);
        tracing::debug!(hits = hits.len(), "answered by keyword scoring");
        hits
    }

    /// `None` whenever the embedding path is unusable for this call.
    fn embedding_retrieve(&self, query: &str, top_k: usize) -> Option<Vec<RetrievedDoc>> {
        let index = self.index()?;
        let encoder = self.encoder.as_ref()?;
        let query_vector = match encoder.encode(query) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(encoder = encoder.name(), error = %e, "query encoding failed; using keyword scoring");
                return None;
            }
        };
        match self.embedding.top_k(&query_vector, &index, top_k) {
            Ok(rows) => Some(
                rows.into_iter()
                    .map(|(row, score)| {
                        let meta = index.metadata_at(row);
                        RetrievedDoc {
                            source: meta.source.clone(),
                            summary: meta.summary.clone(),
                            score,
                            origin: SourceKind::Embedding,
                        }
                    })
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "embedding scorer unusable for this query; using keyword scoring");
                None
            }
        }
    }

    fn keyword_retrieve(&self, query: &str, top_k: usize) -> Vec<RetrievedDoc> {
        let docs = self.store.snapshot();
        self.keyword
            .score(query, &docs, top_k)
            .into_iter()
            .map(|hit| {
                let doc = &docs[hit.index];
                RetrievedDoc {
                    source: doc.source.clone(),
                    summary: doc.summary.clone(),
                    score: hit.score as f32,
                    origin: SourceKind::Keyword,
                }
            })
            .collect()
    }

    /// Rescan the documents directory. Returns the new document count.
    pub fn refresh(&self) -> usize {
        self.store.refresh()
    }

    /// Re-read both embedding stores and swap the index in one step. Returns
    /// whether an index is present afterwards. Without configured stores this
    /// keeps whatever index the engine was given.
    pub fn reload_index(&self) -> bool {
        let Some(files) = &self.index_files else {
            return self.index.read().is_some();
        };
        let fresh = EmbeddingIndex::load(&files.vectors, &files.metadata).map(Arc::new);
        let present = fresh.is_some();
        *self.index.write() = fresh;
        present
    }
}

impl Retriever for RetrievalEngine {
    fn retrieve(&self, query: &str, top_k: usize) -> Vec<RetrievedDoc> {
        Self::retrieve(self, query, top_k)
    }
}
