use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Embedding count mismatch: {vectors} vectors vs {metadata} metadata records")]
    CountMismatch { vectors: usize, metadata: usize },

    #[error("Ragged embedding store: row {row} has length {found}, expected {expected}")]
    RaggedVectors { row: usize, expected: usize, found: usize },

    #[error("Embedding index holds no rows")]
    EmptyIndex,

    #[error("Embedding vectors have zero length")]
    ZeroDimension,

    #[error("Query vector has dimension {found}, index expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Encoder unavailable: {0}")]
    Encoder(String),
}

pub type Result<T> = std::result::Result<T, Error>;
