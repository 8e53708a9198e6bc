use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub source: String,
    pub url: Option<String>,
    pub embedding: Vec<f32>,
    pub content_hash: String,
    pub added_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        let content = content.into();
        let content_hash = Self::hash_content(&content);

        Self {
            title: title.into(),
            content,
            source: source.into(),
            url: None,
            embedding,
            content_hash,
            added_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn hash_content(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}
