use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use kbret_core::traits::TextEncoder;

/// Client for an Ollama-compatible `/api/embeddings` endpoint.
pub struct OllamaEncoder {
    model: String,
    base_url: String,
    client: Client,
    name: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEncoder {
    pub fn new(model: impl Into<String>, base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let model = model.into();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().context("building HTTP client for the embedding service")?;
        let name = format!("ollama:{model}");
        Ok(Self { model, base_url, client, name })
    }
}

impl TextEncoder for OllamaEncoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "model": self.model, "prompt": text }))
            .send()
            .with_context(|| format!("POST {url}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!("Ollama embeddings failed ({}): {}", status, body));
        }

        let parsed: EmbeddingResponse = resp.json().context("decoding embedding response")?;
        if parsed.embedding.is_empty() {
            return Err(anyhow!("Empty embedding response from {}", self.name));
        }
        Ok(parsed.embedding)
    }
}
