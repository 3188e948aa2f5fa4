use anyhow::Result;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use kbret_core::traits::TextEncoder;
use kbret_core::types::normalize;

/// Deterministic bag-of-tokens encoder.
///
/// Each alphanumeric token of the normalized text is hashed into one of `dim`
/// buckets; the result is L2-normalized. Texts sharing tokens get a positive
/// cosine similarity, which is enough for development and tests without a
/// model on disk.
pub struct HashEncoder {
    dim: usize,
    name: String,
}

impl HashEncoder {
    pub fn new(dim: usize) -> Self {
        Self { dim, name: format!("hash:d{dim}") }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl TextEncoder for HashEncoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0f32; self.dim];
        if self.dim == 0 {
            return Ok(v);
        }
        for token in normalize(text).split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let weight = 0.5 + ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += weight;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }
}
