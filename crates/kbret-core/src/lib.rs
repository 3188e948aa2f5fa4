//! kbret-core
//!
//! Shared domain types, the document store, configuration and the error type
//! used across the retrieval crates.
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod document_store;
pub mod error;
pub mod traits;
pub mod types;

pub use document_store::{DocumentStore, Snapshot};
pub use error::{Error, Result};
pub use types::{DocMeta, Document, RetrievedDoc, SourceKind};
