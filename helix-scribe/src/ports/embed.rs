use async_trait::async_trait;

use crate::error::Result;

/// Maps text to a fixed-length vector. Implementations must be deterministic
/// for identical input and keep `dimension()` constant for their lifetime.
#[async_trait]
pub trait EmbeddingGenerator: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn dimension(&self) -> usize;
    fn model_name(&self) -> &str;
}
