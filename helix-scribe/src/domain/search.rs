use super::{Document, DocumentId};

/// A scored, borrowed view of a stored document. Produced per query.
#[derive(Debug, Clone, Copy)]
pub struct RankedResult<'a> {
    pub id: DocumentId,
    pub document: &'a Document,
    pub score: f32,
}
