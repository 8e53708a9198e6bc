#[cfg(feature = "fastembed")]
pub mod fastembed;
pub mod hashing;
pub mod openai;

use std::sync::Arc;

use crate::config::{Config, EmbeddingProvider};
use crate::error::Result;
use crate::ports::{EmbeddingGenerator, TextGenerator};

#[cfg(feature = "fastembed")]
pub use self::fastembed::FastEmbedGenerator;
pub use hashing::HashingEmbedder;
pub use openai::OpenAiGenerator;

pub fn create_embedder(config: &Config) -> Result<Arc<dyn EmbeddingGenerator>> {
    match config.embedding.provider {
        EmbeddingProvider::Hashing => Ok(Arc::new(HashingEmbedder::new(
            config.embedding.hashing_dimension,
        )?)),
        #[cfg(feature = "fastembed")]
        EmbeddingProvider::Fastembed => Ok(Arc::new(FastEmbedGenerator::new()?)),
        #[cfg(not(feature = "fastembed"))]
        EmbeddingProvider::Fastembed => Err(crate::error::ScribeError::Config(
            "built without the `fastembed` feature, set embedding.provider = \"hashing\""
                .to_string(),
        )),
    }
}

pub fn create_generator(config: &Config) -> Result<Arc<dyn TextGenerator>> {
    Ok(Arc::new(OpenAiGenerator::new(&config.generation)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScribeError;

    #[test]
    fn test_hashing_embedder_from_config() {
        let mut config = Config::default();
        config.embedding.provider = EmbeddingProvider::Hashing;
        config.embedding.hashing_dimension = 48;

        let embedder = create_embedder(&config).unwrap();
        assert_eq!(embedder.dimension(), 48);
    }

    #[test]
    fn test_generator_requires_key() {
        let config = Config::default();
        assert!(matches!(
            create_generator(&config),
            Err(ScribeError::MissingApiKey)
        ));
    }
}
