use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kbret_core::config::Config;
use kbret_core::RetrievedDoc;
use kbret_engine::RetrievalEngine;

const SNIPPET_CHARS: usize = 500;

/// Query a directory of plain-text knowledge-base articles.
#[derive(Parser)]
#[command(name = "kbret", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Retrieve the articles most relevant to a question
    Query {
        text: String,

        /// Number of results (defaults to retrieval.default_top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what the engine would use to answer queries
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
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
    let engine = RetrievalEngine::from_settings(&settings);

    match cli.command {
        Command::Query { text, top_k, json } => {
            let k = top_k.unwrap_or(settings.retrieval.default_top_k);
            let hits = engine.retrieve(&text, k);
            if json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                print_hits(&text, &hits);
            }
        }
        Command::Status => {
            println!("Environment: {}", config.env_name());
            println!("Documents:   {} in {}", engine.store().len(), engine.store().dir().display());
            match engine.index() {
                Some(index) => println!("Index:       {} vectors, dim {}", index.vector_count(), index.dim()),
                None => println!("Index:       absent (keyword retrieval only)"),
            }
            println!("Encoder:     {}", if engine.has_encoder() { "configured" } else { "none" });
        }
    }
    Ok(())
}

fn print_hits(query: &str, hits: &[RetrievedDoc]) {
    if hits.is_empty() {
        println!("No documents found for '{}'", query);
        return;
    }
    println!("🔍 Results for '{}'\n", query);
    for (rank, hit) in hits.iter().enumerate() {
        println!("{}. {} (score {:.4}, {:?})", rank + 1, hit.source, hit.score, hit.origin);
        let snippet = snippet(&hit.summary);
        if !snippet.is_empty() {
            println!("   {}", snippet);
        }
    }
}

/// Whitespace collapsed to single spaces, cut at `SNIPPET_CHARS` characters.
fn snippet(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}…", &collapsed[..cut]),
        None => collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_collapses_and_truncates() {
        assert_eq!(snippet("  a\n\tb   c "), "a b c");
        let long = "é".repeat(SNIPPET_CHARS + 10);
        let cut = snippet(&long);
        assert_eq!(cut.chars().count(), SNIPPET_CHARS + 1);
        assert!(cut.ends_with('…'));
    }
}
