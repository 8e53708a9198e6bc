//! Feature-hashing embedder.
//!
//! Each lowercased token is hashed into one of `dimension` buckets and the
//! term-frequency vector is L2-normalized. No vocabulary is kept, so the same
//! text always maps to the same vector regardless of what else was embedded.
//! Token hashes use blake3 so vectors are stable across builds and can be
//! persisted.

use async_trait::async_trait;

use crate::error::{Result, ScribeError};
use crate::ports::EmbeddingGenerator;

pub const DEFAULT_DIMENSION: usize = 256;

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    model_name: String,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(ScribeError::Config(
                "hashing embedder dimension must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            dimension,
            model_name: format!("feature-hash-{dimension}"),
        })
    }

    #[allow(clippy::cast_possible_truncation)] // bucket index is reduced modulo dimension
    fn bucket(&self, token: &str) -> usize {
        let hash = blake3::hash(token.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash.as_bytes()[..8]);
        (u64::from_le_bytes(prefix) % self.dimension as u64) as usize
    }

    /// Synchronous core of `embed`. A text with no alphanumeric tokens maps to
    /// the zero vector.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut tf = vec![0.0f32; self.dimension];

        for token in text
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|t| !t.is_empty())
        {
            tf[self.bucket(&token.to_lowercase())] += 1.0;
        }

        let norm: f32 = tf.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut tf {
                *x /= norm;
            }
        }

        tf
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            model_name: format!("feature-hash-{DEFAULT_DIMENSION}"),
        }
    }
}

#[async_trait]
impl EmbeddingGenerator for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
