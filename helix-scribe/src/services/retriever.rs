use std::sync::Arc;

use crate::domain::RankedResult;
use crate::error::{Result, ScribeError};
use crate::ports::EmbeddingGenerator;
use crate::services::store::DocumentStore;

pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn is_degenerate(norm: f32) -> bool {
    norm == 0.0 || !norm.is_finite()
}

/// Cosine from precomputed, non-degenerate norms.
fn cosine_with_norms(a: &[f32], b: &[f32], norm_a: f32, norm_b: f32) -> f32 {
    (dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Cosine similarity of two equal-length vectors, clamped to `[-1, 1]`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ScribeError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }

    let (norm_a, norm_b) = (l2_norm(a), l2_norm(b));
    if is_degenerate(norm_a) || is_degenerate(norm_b) {
        return Err(ScribeError::DegenerateVector(
            "zero or non-finite norm".to_string(),
        ));
    }

    Ok(cosine_with_norms(a, b, norm_a, norm_b))
}

/// Ranks stored documents against a query by cosine similarity.
pub struct Retriever<E: EmbeddingGenerator + ?Sized> {
    embedder: Arc<E>,
}

impl<E: EmbeddingGenerator + ?Sized> Retriever<E> {
    pub const fn new(embedder: Arc<E>) -> Self {
        Self { embedder }
    }

    /// Returns at most `min(k, store.len())` results, highest score first.
    /// Equal scores keep insertion order. Documents with a zero-norm
    /// embedding are skipped.
    pub async fn find_top_k<'a, S>(
        &self,
        store: &'a DocumentStore<S>,
        query: &str,
        k: usize,
    ) -> Result<Vec<RankedResult<'a>>>
    where
        S: EmbeddingGenerator + ?Sized,
    {
        if store.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        if query_embedding.len() != store.dimension() {
            return Err(ScribeError::DimensionMismatch {
                expected: store.dimension(),
                found: query_embedding.len(),
            });
        }

        let query_norm = l2_norm(&query_embedding);
        if is_degenerate(query_norm) {
            return Err(ScribeError::DegenerateVector(format!(
                "query {query:?} embeds to a zero vector"
            )));
        }

        let mut ranked: Vec<RankedResult<'a>> = store
            .entries()
            .filter_map(|(id, document, norm)| {
                if is_degenerate(norm) || document.embedding.len() != query_embedding.len() {
                    tracing::warn!(%id, title = %document.title, "skipping document with degenerate embedding");
                    return None;
                }

                Some(RankedResult {
                    id,
                    document,
                    score: cosine_with_norms(&query_embedding, &document.embedding, query_norm, norm),
                })
            })
            .collect();

        // stable: ties stay in insertion order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(k);

        tracing::debug!(
            query,
            candidates = store.len(),
            returned = ranked.len(),
            "ranked documents"
        );

        Ok(ranked)
    }
}
