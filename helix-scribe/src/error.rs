use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScribeError {
    #[error("Document content is empty")]
    EmptyContent,

    #[error("Degenerate embedding vector: {0}")]
    DegenerateVector(String),

    #[error("Corrupt store snapshot: {0}")]
    CorruptState(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Generation service error: {0}")]
    GenerationService(String),

    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("No API key configured, set OPENAI_API_KEY or generation.api_key")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ScribeError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::EmptyContent | Self::DimensionMismatch { .. } => 1,
            Self::DegenerateVector(_) => 2,
            Self::CorruptState(_) | Self::Snapshot(_) => 3,
            Self::GenerationService(_) | Self::Http(_) => 4,
            Self::Embedding(_) => 5,
            Self::MissingApiKey | Self::Config(_) => 6,
            Self::Io(_) | Self::Serialization(_) => 10,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScribeError>;
