//! On-disk form of the two embedding stores.
//!
//! - vector store: JSON array of rows, each row an array of numbers
//! - metadata store: JSON array of `{"source", "summary"}` objects
//!
//! Both are rewritten whole through a temp file in the target directory and
//! renamed into place.
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use kbret_core::error::{Error, Result};
use kbret_core::types::DocMeta;

pub const EMBEDDINGS_FILE: &str = "embeddings.json";
pub const METADATA_FILE: &str = "metadata.json";

pub fn read_vectors(path: &Path) -> Result<Vec<Vec<f32>>> {
    read_json(path)
}

pub fn read_metadata(path: &Path) -> Result<Vec<DocMeta>> {
    read_json(path)
}

pub fn write_vectors(path: &Path, vectors: &[Vec<f32>]) -> Result<()> {
    write_json(path, &vectors)
}

pub fn write_metadata(path: &Path, metadata: &[DocMeta]) -> Result<()> {
    write_json(path, &metadata)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = fs::File::open(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Json { path: path.to_path_buf(), source })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let io_err = |source| Error::Io { path: path.to_path_buf(), source };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;
    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut w = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut w, value).map_err(|source| Error::Json { path: path.to_path_buf(), source })?;
        w.flush().map_err(io_err)?;
    }
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
