pub mod ingestion;
pub mod orchestrator;
pub mod prompt;
pub mod retriever;
pub mod store;

pub use ingestion::{ImportReport, IngestionService, RawRecord, RecordOutcome, read_records};
pub use orchestrator::GenerationOrchestrator;
pub use prompt::{AssembledPrompt, PromptAssembler};
pub use retriever::{Retriever, cosine_similarity};
pub use store::DocumentStore;
