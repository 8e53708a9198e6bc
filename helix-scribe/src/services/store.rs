use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::domain::{Document, DocumentId};
use crate::error::{Result, ScribeError};
use crate::ports::EmbeddingGenerator;
use crate::services::retriever::l2_norm;

const SNAPSHOT_VERSION: u32 = 1;
const MAX_SNAPSHOT_BYTES: u64 = 1 << 30;

fn snapshot_codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_SNAPSHOT_BYTES)
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    model: &'a str,
    dimension: usize,
    documents: &'a [Document],
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    model: String,
    dimension: usize,
    documents: Vec<Document>,
}

/// Ordered, append-only collection of embedded documents.
///
/// Mutation (`add`, `restore`, `clear`) takes `&mut self`; share the store
/// behind a `tokio::sync::RwLock` to get concurrent reads with a single
/// writer.
pub struct DocumentStore<E: EmbeddingGenerator + ?Sized> {
    embedder: Arc<E>,
    documents: Vec<Document>,
    norms: Vec<f32>,
}

impl<E: EmbeddingGenerator + ?Sized> DocumentStore<E> {
    pub const fn new(embedder: Arc<E>) -> Self {
        Self {
            embedder,
            documents: Vec::new(),
            norms: Vec::new(),
        }
    }

    pub async fn add(
        &mut self,
        title: &str,
        content: &str,
        source: &str,
        url: Option<String>,
    ) -> Result<DocumentId> {
        if content.trim().is_empty() {
            return Err(ScribeError::EmptyContent);
        }

        let embedding = self.embedder.embed(content).await?;
        if embedding.len() != self.dimension() {
            return Err(ScribeError::DimensionMismatch {
                expected: self.dimension(),
                found: embedding.len(),
            });
        }

        let norm = l2_norm(&embedding);
        let doc = Document::new(title, content, source, embedding).with_url(url);
        let id = DocumentId::new(self.documents.len());

        self.documents.push(doc);
        self.norms.push(norm);
        tracing::info!(%id, title, source, "added document");

        Ok(id)
    }

    /// Provider that produced every embedding in this store. Queries against
    /// the store must be embedded with it.
    pub const fn embedder(&self) -> &Arc<E> {
        &self.embedder
    }

    pub fn all(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(id.index())
    }

    /// Documents in insertion order with their cached embedding norms.
    pub fn entries(&self) -> impl Iterator<Item = (DocumentId, &Document, f32)> + '_ {
        self.documents
            .iter()
            .zip(self.norms.iter().copied())
            .enumerate()
            .map(|(i, (doc, norm))| (DocumentId::new(i), doc, norm))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
        self.norms.clear();
    }

    pub fn contains_content(&self, content: &str) -> bool {
        let hash = Document::hash_content(content);
        self.documents.iter().any(|d| d.content_hash == hash)
    }

    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    pub fn persist<W: Write>(&self, writer: W) -> Result<()> {
        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            model: self.model_name(),
            dimension: self.dimension(),
            documents: &self.documents,
        };
        snapshot_codec().serialize_into(writer, &snapshot)?;
        Ok(())
    }

    /// Replaces the whole in-memory sequence with the snapshot contents. On
    /// error the current documents are left untouched.
    pub fn restore<R: Read>(&mut self, reader: R) -> Result<usize> {
        let snapshot: Snapshot = snapshot_codec().deserialize_from(reader)?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(ScribeError::CorruptState(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let expected = self.dimension();
        if snapshot.dimension != expected {
            return Err(ScribeError::CorruptState(format!(
                "snapshot dimension {} does not match provider dimension {expected}",
                snapshot.dimension
            )));
        }

        if let Some((i, doc)) = snapshot
            .documents
            .iter()
            .enumerate()
            .find(|(_, d)| d.dimension() != expected)
        {
            return Err(ScribeError::CorruptState(format!(
                "document {i} has dimension {}, expected {expected}",
                doc.dimension()
            )));
        }

        if snapshot.model != self.model_name() {
            tracing::warn!(
                snapshot_model = %snapshot.model,
                provider_model = self.model_name(),
                "restoring snapshot produced by a different embedding model"
            );
        }

        self.norms = snapshot.documents.iter().map(|d| l2_norm(&d.embedding)).collect();
        self.documents = snapshot.documents;

        Ok(self.documents.len())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.persist(&mut writer)?;
        writer.flush()?;

        tracing::info!(path = %path.display(), documents = self.len(), "saved store");
        Ok(())
    }

    /// Restores from `path`. A missing file leaves the store as it is.
    pub fn load(&mut self, path: &Path) -> Result<usize> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no snapshot found");
            return Ok(0);
        }

        let count = self.restore(BufReader::new(File::open(path)?))?;
        tracing::info!(path = %path.display(), documents = count, "loaded store");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::HashingEmbedder;
    use pretty_assertions::assert_eq;

    fn store(dimension: usize) -> DocumentStore<HashingEmbedder> {
        DocumentStore::new(Arc::new(HashingEmbedder::new(dimension).unwrap()))
    }

    #[tokio::test]
    async fn test_add_appends_in_order() {
        let mut store = store(64);
        let a = store.add("A", "First article.", "NYT", None).await.unwrap();
        let b = store
            .add("B", "Second article.", "WSJ", Some("https://wsj.com/b".into()))
            .await
            .unwrap();

        assert_eq!(a, DocumentId::new(0));
        assert_eq!(b, DocumentId::new(1));
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[1].title, "B");
        assert_eq!(store.get(b).unwrap().url.as_deref(), Some("https://wsj.com/b"));
        assert_eq!(store.all()[0].embedding.len(), 64);
    }

    #[tokio::test]
    async fn test_empty_content_rejected_without_growth() {
        let mut store = store(64);
        store.add("A", "Some text.", "NYT", None).await.unwrap();

        for content in ["", "   ", "\n\t"] {
            let err = store.add("X", content, "NYT", None).await.unwrap_err();
            assert!(matches!(err, ScribeError::EmptyContent));
        }
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_through_bytes() {
        let mut original = store(32);
        original.add("A", "Remote work changes cities.", "WSJ", None).await.unwrap();
        original
            .add("B", "Climate policy and markets.", "NYT", Some("https://nyt.com/b".into()))
            .await
            .unwrap();

        let mut bytes = Vec::new();
        original.persist(&mut bytes).unwrap();

        let mut restored = store(32);
        restored.add("stale", "will be replaced", "x", None).await.unwrap();
        assert_eq!(restored.restore(bytes.as_slice()).unwrap(), 2);

        assert_eq!(restored.all(), original.all());
        let norms: Vec<f32> = restored.entries().map(|(_, _, n)| n).collect();
        let expected: Vec<f32> = original.entries().map(|(_, _, n)| n).collect();
        assert_eq!(norms, expected);
    }

    #[tokio::test]
    async fn test_restore_rejects_other_dimension() {
        let mut original = store(32);
        original.add("A", "Some content here.", "WSJ", None).await.unwrap();
        let mut bytes = Vec::new();
        original.persist(&mut bytes).unwrap();

        let mut other = store(16);
        other.add("keep", "kept content", "x", None).await.unwrap();
        let err = other.restore(bytes.as_slice()).unwrap_err();

        assert!(matches!(err, ScribeError::CorruptState(_)));
        assert_eq!(other.len(), 1);
        assert_eq!(other.all()[0].title, "keep");
    }

    #[tokio::test]
    async fn test_restore_rejects_record_of_other_dimension() {
        let mut store = store(4);
        store.add("keep", "kept content", "x", None).await.unwrap();
        let before = store.all().to_vec();

        let documents = vec![Document::new("bad", "Two dims only.", "NYT", vec![1.0, 0.0])];
        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            model: store.model_name(),
            dimension: 4,
            documents: &documents,
        };
        let bytes = snapshot_codec().serialize(&snapshot).unwrap();

        let err = store.restore(bytes.as_slice()).unwrap_err();
        match err {
            ScribeError::CorruptState(msg) => assert!(msg.contains("document 0")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn test_embedder_is_shared() {
        let embedder = Arc::new(HashingEmbedder::new(8).unwrap());
        let store = DocumentStore::new(Arc::clone(&embedder));
        assert!(Arc::ptr_eq(store.embedder(), &embedder));
    }

    #[test]
    fn test_restore_rejects_garbage() {
        let mut store = store(16);
        let err = store.restore(&b"definitely not a snapshot"[..]).unwrap_err();
        assert!(matches!(
            err,
            ScribeError::Snapshot(_) | ScribeError::CorruptState(_)
        ));
    }

    #[tokio::test]
    async fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scribe.bin");

        let mut original = store(32);
        original.add("A", "Economists are cautious.", "WSJ", None).await.unwrap();
        original.save(&path).unwrap();

        let mut loaded = store(32);
        assert_eq!(loaded.load(&path).unwrap(), 1);
        assert_eq!(loaded.all(), original.all());

        let mut missing = store(32);
        assert_eq!(missing.load(&dir.path().join("absent.bin")).unwrap(), 0);
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_contains_content_and_clear() {
        let mut store = store(16);
        store.add("A", "unique words", "x", None).await.unwrap();
        assert!(store.contains_content("unique words"));
        assert!(!store.contains_content("other words"));

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.entries().count(), 0);
    }
}
