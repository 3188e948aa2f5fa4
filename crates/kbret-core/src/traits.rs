use crate::types::RetrievedDoc;

/// External text encoder producing fixed-dimension embeddings.
///
/// Implementations may be slow or unavailable; callers treat any error as
/// "no embedding for this text" and fall back.
pub trait TextEncoder: Send + Sync {
    /// Short identifier used in logs (e.g. `hash:d384`, `ollama:nomic-embed-text`).
    fn name(&self) -> &str;

    fn encode(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    fn encode_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.encode(t)).collect()
    }
}

pub trait Retriever: Send + Sync {
    fn retrieve(&self, query: &str, top_k: usize) -> Vec<RetrievedDoc>;
}
