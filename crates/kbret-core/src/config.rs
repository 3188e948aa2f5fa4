//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `KBRET_*` env vars.
//! Nested keys in env vars are separated by `__`, so `KBRET_DATA__DOCS_DIR`
//! overrides `data.docs_dir`. Every setting has a default; an empty
//! configuration is valid.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            other => tracing::debug!(env = other, "no environment-specific config file for this RUST_ENV"),
        }
        figment = figment.merge(Env::prefixed("KBRET_").split("__"));

        let config = Self { figment, env_name };
        config.settings()?;
        Ok(config)
    }

    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed view of the whole configuration, validated.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self.figment.extract().map_err(|e| Error::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub retrieval: RetrievalSettings,
    pub encoder: EncoderSettings,
}

impl Settings {
    fn validate(&self) -> Result<()> {
        if self.encoder.batch_size == 0 {
            return Err(Error::Config("encoder.batch_size must be at least 1".into()));
        }
        if self.encoder.backend == EncoderBackend::Hash && self.encoder.dim == 0 {
            return Err(Error::Config("encoder.dim must be at least 1 for the hash backend".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub docs_dir: String,
    pub embeddings_path: String,
    pub metadata_path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            docs_dir: "data".to_string(),
            embeddings_path: "data/embeddings.json".to_string(),
            metadata_path: "data/metadata.json".to_string(),
        }
    }
}

impl DataSettings {
    pub fn docs_path(&self) -> PathBuf {
        expand_path(&self.docs_dir)
    }

    pub fn embeddings_file(&self) -> PathBuf {
        expand_path(&self.embeddings_path)
    }

    pub fn metadata_file(&self) -> PathBuf {
        expand_path(&self.metadata_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub default_top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { default_top_k: 5 }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EncoderBackend {
    #[default]
    None,
    Hash,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    pub backend: EncoderBackend,
    pub model: String,
    pub base_url: String,
    /// Output dimension of the hash backend. Ignored by other backends.
    pub dim: usize,
    /// Deadline for a single query encoding; 0 disables it.
    pub timeout_ms: u64,
    pub batch_size: usize,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            backend: EncoderBackend::None,
            model: "nomic-embed-text".to_string(),
            base_url: "http://localhost:11434".to_string(),
            dim: 384,
            timeout_ms: 5_000,
            batch_size: 32,
        }
    }
}

impl EncoderSettings {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
