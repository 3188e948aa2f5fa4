//! Directory-backed document store with atomically swapped snapshots.
//!
//! Documents are the `.txt` files directly inside one directory, in
//! lexicographic file-name order. That order is the tie-break baseline for
//! every ranking built on top of the store, so it is fixed at load time and
//! never re-sorted.
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::Document;

/// Immutable, fully-loaded view of the documents directory.
pub type Snapshot = Arc<Vec<Document>>;

pub struct DocumentStore {
    dir: PathBuf,
    snapshot: RwLock<Snapshot>,
}

impl DocumentStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let docs = load_documents(&dir);
        Self { dir, snapshot: RwLock::new(Arc::new(docs)) }
    }

    /// In-memory store, mostly for tests and embedding callers that already
    /// hold their documents. `refresh` on such a store rescans `dir`.
    pub fn from_documents(dir: impl Into<PathBuf>, docs: Vec<Document>) -> Self {
        Self { dir: dir.into(), snapshot: RwLock::new(Arc::new(docs)) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Current snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.snapshot.read())
    }

    pub fn len(&self) -> usize {
        self.snapshot.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rescan the directory and publish the new document list in one swap.
    /// Returns the new document count.
    pub fn refresh(&self) -> usize {
        let docs = Arc::new(load_documents(&self.dir));
        let count = docs.len();
        *self.snapshot.write() = docs;
        tracing::info!(dir = %self.dir.display(), documents = count, "document store refreshed");
        count
    }
}

/// Load every non-hidden `.txt` file directly under `dir`, sorted by file name.
///
/// A missing or unreadable directory yields no documents. A file that cannot
/// be read yields a document with empty text rather than aborting the scan.
pub fn load_documents(dir: &Path) -> Vec<Document> {
    if !dir.is_dir() {
        tracing::info!(dir = %dir.display(), "documents directory not found; store is empty");
        return Vec::new();
    }
    let docs: Vec<Document> = list_txt_files(dir)
        .into_iter()
        .map(|path| {
            let source = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            Document::new(source, read_file_content(&path))
        })
        .collect();
    tracing::debug!(dir = %dir.display(), documents = docs.len(), "loaded documents");
    docs
}

fn read_file_content(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => decode_utf8_skipping_invalid(&bytes),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable document; using empty text");
            String::new()
        }
    }
}

/// Decode UTF-8, silently dropping any invalid byte sequences.
fn decode_utf8_skipping_invalid(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.utf8_chunks().map(|chunk| chunk.valid()).collect(),
    }
}

fn list_txt_files(root: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        // hidden files (e.g. `._name.txt` AppleDouble sidecars) are not articles
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("txt"))
        .map(|e| e.into_path())
        .collect()
}
