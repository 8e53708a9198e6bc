pub mod document;
pub mod generation;
pub mod id;
pub mod prompt;
pub mod search;

pub use document::Document;
pub use generation::{Generation, INSUFFICIENT_CONTEXT};
pub use id::DocumentId;
pub use prompt::{Exemplar, PromptBundle, StyleMode};
pub use search::RankedResult;
