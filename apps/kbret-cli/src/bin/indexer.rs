use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kbret_core::config::{expand_path, Config};
use kbret_core::DocumentStore;
use kbret_embed::select_encoder;
use kbret_vector::{build_index, write_index};

/// Embed every article in the documents directory and write the vector and
/// metadata stores used for semantic retrieval.
#[derive(Parser)]
#[command(name = "kbret-indexer", version, about)]
struct Args {
    /// Documents directory (defaults to data.docs_dir)
    #[arg(long)]
    docs_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    let docs_dir: PathBuf = args.docs_dir.map(expand_path).unwrap_or_else(|| settings.data.docs_path());
    let vectors_path = settings.data.embeddings_file();
    let metadata_path = settings.data.metadata_file();

    println!("KB Indexer\n==========");
    println!("Documents directory: {}", docs_dir.display());

    let store = DocumentStore::open(&docs_dir);
    let docs = store.snapshot();
    if docs.is_empty() {
        anyhow::bail!("no .txt documents found in {}", docs_dir.display());
    }

    let encoder = select_encoder(&settings.encoder)
        .context("no text encoder available; set encoder.backend to \"hash\" or \"ollama\"")?;
    println!("Encoder: {}", encoder.name());

    let index = build_index(&docs, encoder.as_ref(), settings.encoder.batch_size)?;
    write_index(&index, &vectors_path, &metadata_path)?;

    println!("\n✅ Indexed {} documents (dim {})", index.vector_count(), index.dim());
    println!("📄 Vectors:  {}", vectors_path.display());
    println!("📄 Metadata: {}", metadata_path.display());
    println!("\n💡 To query, use: cargo run --bin kbret -- query '<question>'");
    Ok(())
}
