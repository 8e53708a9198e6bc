use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScribeError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store_path: PathBuf,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub retrieval: RetrievalConfig,
    pub decoding: DecodingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(".helix/scribe.bin"),
            embedding: EmbeddingConfig::default(),
            generation: GenerationConfig::default(),
            retrieval: RetrievalConfig::default(),
            decoding: DecodingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    #[default]
    Fastembed,
    Hashing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub hashing_dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            hashing_dimension: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            timeout_secs: 60,
            max_tokens: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub exemplar_sentences: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            exemplar_sentences: 3,
        }
    }
}

/// Sampling temperatures per request kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodingConfig {
    pub baseline_temperature: f32,
    pub evasion_temperature: f32,
    pub rewrite_temperature: f32,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self {
            baseline_temperature: 0.7,
            evasion_temperature: 0.9,
            rewrite_temperature: 1.0,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project()?;
        let merged = Self::merge(global, project);
        Ok(merged.with_env_overrides())
    }

    fn load_global() -> Result<Option<Self>> {
        let config_dir = directories::ProjectDirs::from("", "", "helix").map_or_else(
            || PathBuf::from("~/.config/helix"),
            |d| d.config_dir().to_path_buf(),
        );

        Self::load_file(&config_dir.join("helix-scribe.toml"))
    }

    fn load_project() -> Result<Option<Self>> {
        Self::load_file(&PathBuf::from(".helix/helix-scribe.toml"))
    }

    fn load_file(path: &std::path::Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map(Some)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ScribeError::Config(e.to_string()))
    }

    fn merge(global: Option<Self>, project: Option<Self>) -> Self {
        match (global, project) {
            (Some(global), Some(project)) => Self {
                generation: GenerationConfig {
                    api_key: project.generation.api_key.or(global.generation.api_key),
                    ..project.generation
                },
                ..project
            },
            (None, Some(config)) | (Some(config), None) => config,
            (None, None) => Self::default(),
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.trim().is_empty()
        {
            self.generation.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("HELIX_SCRIBE_BASE_URL") {
            self.generation.base_url = url;
        }
        if let Ok(model) = std::env::var("HELIX_SCRIBE_MODEL") {
            self.generation.model = model;
        }
        self
    }
}
