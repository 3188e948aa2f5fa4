use std::cmp::Ordering;

use kbret_core::error::{Error, Result};

use crate::index::EmbeddingIndex;

/// Added to the norm product so a zero vector scores 0 instead of NaN.
pub const COSINE_EPS: f32 = 1e-12;

/// `dot(a, b) / (|a| * |b| + eps)`. Not clamped.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f32>().sqrt();
    dot / (norm_a * norm_b + COSINE_EPS)
}

/// Exhaustive cosine scoring over every row of an [`EmbeddingIndex`].
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddingScorer;

impl EmbeddingScorer {
    pub fn new() -> Self {
        Self
    }

    /// One `(row, score)` per index row, in row order.
    pub fn score(&self, query_vector: &[f32], index: &EmbeddingIndex) -> Result<Vec<(usize, f32)>> {
        if query_vector.len() != index.dim() {
            return Err(Error::DimensionMismatch { expected: index.dim(), found: query_vector.len() });
        }
        Ok((0..index.vector_count())
            .map(|row| (row, cosine_similarity(index.vector_at(row), query_vector)))
            .collect())
    }

    /// The `k` best rows, highest score first; equal scores keep row order.
    pub fn top_k(&self, query_vector: &[f32], index: &EmbeddingIndex, k: usize) -> Result<Vec<(usize, f32)>> {
        let mut scored = self.score(query_vector, index)?;
        scored.sort_by(|a, b| descending(a.1, b.1));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Descending order with NaN after every real score.
fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}
