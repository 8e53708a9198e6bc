use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::DocumentId;
use crate::error::{Result, ScribeError};
use crate::ports::EmbeddingGenerator;
use crate::services::store::DocumentStore;

/// A captured article as produced by collectors. Only `content` is required
/// to end up in the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl RawRecord {
    pub fn title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.trim().is_empty()).unwrap_or("Untitled")
    }

    pub fn source(&self) -> &str {
        self.source.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Added(DocumentId),
    SkippedEmpty,
    SkippedDuplicate,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub added: usize,
    pub skipped_empty: usize,
    pub skipped_duplicate: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Added(_) => self.added += 1,
            RecordOutcome::SkippedEmpty => self.skipped_empty += 1,
            RecordOutcome::SkippedDuplicate => self.skipped_duplicate += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.added + self.skipped_empty + self.skipped_duplicate + self.errors.len()
    }
}

/// Reads a JSON array of raw records.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Feeds raw records into a shared store through `DocumentStore::add`.
pub struct IngestionService<E: EmbeddingGenerator + ?Sized> {
    store: Arc<RwLock<DocumentStore<E>>>,
}

impl<E: EmbeddingGenerator + ?Sized> IngestionService<E> {
    pub const fn new(store: Arc<RwLock<DocumentStore<E>>>) -> Self {
        Self { store }
    }

    pub async fn import_record(&self, record: &RawRecord) -> Result<RecordOutcome> {
        let content = record.content.as_deref().unwrap_or_default();

        let mut store = self.store.write().await;
        if store.contains_content(content) {
            tracing::debug!(title = record.title(), "skipping duplicate record");
            return Ok(RecordOutcome::SkippedDuplicate);
        }

        match store
            .add(record.title(), content, record.source(), record.url.clone())
            .await
        {
            Ok(id) => Ok(RecordOutcome::Added(id)),
            Err(ScribeError::EmptyContent) => {
                tracing::debug!(title = record.title(), "skipping record without content");
                Ok(RecordOutcome::SkippedEmpty)
            }
            Err(e) => Err(e),
        }
    }

    /// Imports every record, calling `on_record` after each one. A failing
    /// record is reported and does not stop the import.
    pub async fn import<F>(&self, records: &[RawRecord], mut on_record: F) -> ImportReport
    where
        F: FnMut(&RawRecord),
    {
        let mut report = ImportReport::default();

        for record in records {
            match self.import_record(record).await {
                Ok(outcome) => report.record(outcome),
                Err(e) => report.errors.push(format!("{}: {e}", record.title())),
            }
            on_record(record);
        }

        tracing::info!(
            added = report.added,
            skipped_empty = report.skipped_empty,
            skipped_duplicate = report.skipped_duplicate,
            errors = report.errors.len(),
            "import finished"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::HashingEmbedder;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn service() -> IngestionService<HashingEmbedder> {
        let store = DocumentStore::new(Arc::new(HashingEmbedder::default()));
        IngestionService::new(Arc::new(RwLock::new(store)))
    }

    #[tokio::test]
    async fn test_defaults_and_skips() {
        let records: Vec<RawRecord> = serde_json::from_str(
            r#"[
                {"title": "AI in Healthcare", "content": "AI helps doctors.", "source": "PLOS ONE", "url": "https://plos.org/a"},
                {"content": "An untitled piece."},
                {"title": "Blank", "content": "   "},
                {"title": "No content"},
                {"title": "Copy", "content": "AI helps doctors."}
            ]"#,
        )
        .unwrap();

        let service = service();
        let mut seen = Vec::new();
        let report = service
            .import(&records, |record| seen.push(record.title().to_string()))
            .await;

        assert_eq!(
            seen,
            vec!["AI in Healthcare", "Untitled", "Blank", "No content", "Copy"]
        );

        assert_eq!(report.added, 2);
        assert_eq!(report.skipped_empty, 2);
        assert_eq!(report.skipped_duplicate, 1);
        assert!(report.errors.is_empty());
        assert_eq!(report.total(), 5);

        let store = service.store.read().await;
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].url.as_deref(), Some("https://plos.org/a"));
        assert_eq!(store.all()[1].title, "Untitled");
        assert_eq!(store.all()[1].source, "Unknown");
    }

    #[test]
    fn test_read_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"title": "A", "content": "Body.", "source": "WSJ"}}]"#).unwrap();

        let records = read_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source.as_deref(), Some("WSJ"));
    }

    #[test]
    fn test_read_records_rejects_non_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "A"}}"#).unwrap();

        let err = read_records(file.path()).unwrap_err();
        assert!(matches!(err, ScribeError::Serialization(_)));
    }
}
