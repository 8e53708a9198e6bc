//! Local sentence-transformer embeddings via `fastembed`.

use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::error::{Result, ScribeError};
use crate::ports::EmbeddingGenerator;

const MODEL_NAME: &str = "all-MiniLM-L6-v2";
const DIMENSION: usize = 384;

pub struct FastEmbedGenerator {
    model: Arc<TextEmbedding>,
}

impl FastEmbedGenerator {
    /// Loads the model, downloading it into the fastembed cache on first use.
    pub fn new() -> Result<Self> {
        let options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        let model =
            TextEmbedding::try_new(options).map_err(|e| ScribeError::Embedding(e.to_string()))?;
        tracing::debug!(model = MODEL_NAME, "loaded embedding model");

        Ok(Self {
            model: Arc::new(model),
        })
    }
}

#[async_trait]
impl EmbeddingGenerator for FastEmbedGenerator {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let model = Arc::clone(&self.model);
        let text = text.to_owned();

        let mut embeddings = tokio::task::spawn_blocking(move || model.embed(vec![text], None))
            .await
            .map_err(|e| ScribeError::Embedding(e.to_string()))?
            .map_err(|e| ScribeError::Embedding(e.to_string()))?;

        embeddings
            .pop()
            .ok_or_else(|| ScribeError::Embedding("model returned no embedding".to_string()))
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}
