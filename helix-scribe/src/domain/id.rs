use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a document in its store. Stable until the store is cleared or
/// restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(usize);

impl DocumentId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc-{}", self.0)
    }
}

impl From<DocumentId> for usize {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}
