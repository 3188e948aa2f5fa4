//! Text encoders consumed by the retrieval engine and the index builder.
//!
//! The embedding model itself lives outside this workspace; what lives here is
//! the client for it (`OllamaEncoder`), a deterministic stand-in for tests and
//! development (`HashEncoder`) and the deadline wrapper the engine puts around
//! query encoding.
use std::sync::Arc;

use kbret_core::config::{EncoderBackend, EncoderSettings};
use kbret_core::traits::TextEncoder;

pub mod deadline;
pub mod hash;
pub mod ollama;

pub use deadline::DeadlineEncoder;
pub use hash::HashEncoder;
pub use ollama::OllamaEncoder;

/// Pick the configured encoder, or `None` when semantic search is disabled or
/// the encoder cannot be constructed. `KBRET_USE_HASH_ENCODER=1` forces the
/// hash encoder regardless of configuration.
pub fn select_encoder(settings: &EncoderSettings) -> Option<Arc<dyn TextEncoder>> {
    let force_hash = std::env::var("KBRET_USE_HASH_ENCODER")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let backend = if force_hash { EncoderBackend::Hash } else { settings.backend };

    match backend {
        EncoderBackend::None => {
            tracing::info!("no text encoder configured; keyword retrieval only");
            None
        }
        EncoderBackend::Hash => {
            tracing::info!(dim = settings.dim, "using hash encoder");
            Some(Arc::new(HashEncoder::new(settings.dim)))
        }
        EncoderBackend::Ollama => match OllamaEncoder::new(&settings.model, &settings.base_url, settings.timeout()) {
            Ok(enc) => {
                tracing::info!(model = %settings.model, url = %settings.base_url, "using ollama encoder");
                Some(Arc::new(enc))
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to initialise ollama encoder; keyword retrieval only");
                None
            }
        },
    }
}
