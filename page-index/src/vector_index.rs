//! In-process vector store: dense chunk vectors plus payloads, cosine
//! top-K search with an optional score threshold.
//!
//! Keep the vector-store concerns isolated and easy to replace:
//! - Hold `(payload, vector)` pairs built once per source set.
//! - k-NN search by cosine similarity.
//! - Serde-serializable for the persistence path.
//!
//! This module does **not** chunk documents or create embeddings — only
//! storage and scoring.

use serde::{Deserialize, Serialize};

use crate::structs::index_store::{ChunkPayload, IndexStats, SearchHit};

/// One embedded chunk inside the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub payload: ChunkPayload,
    pub vector: Vec<f32>,
}

/// Similarity-searchable index over one or more documents.
///
/// Append-only after construction; callers share it behind `Arc` and never
/// mutate it once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Embedding dimensionality every stored vector satisfies.
    pub dim: usize,
    /// blake3 key of the exact ordered source URL list this index was built from.
    pub source_key: String,
    /// Ordered source URLs (for diagnostics and persistence validation).
    pub source_urls: Vec<String>,
    /// Build statistics.
    pub stats: IndexStats,
    chunks: Vec<IndexedChunk>,
}

impl VectorIndex {
    pub(crate) fn new(
        dim: usize,
        source_key: String,
        source_urls: Vec<String>,
        stats: IndexStats,
        chunks: Vec<IndexedChunk>,
    ) -> Self {
        Self {
            dim,
            source_key,
            source_urls,
            stats,
            chunks,
        }
    }

    /// Number of embedded chunks stored.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Ranks all chunks against `query_vec` and returns the top `k` hits.
    ///
    /// Hits below `min_score` are filtered out when a threshold is set.
    pub fn search_vector(
        &self,
        query_vec: &[f32],
        k: usize,
        min_score: Option<f32>,
    ) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = self
            .chunks
            .iter()
            .map(|chunk| SearchHit {
                score: cosine_similarity(query_vec, &chunk.vector),
                id: chunk.payload.id.clone(),
                source_url: chunk.payload.source_url.clone(),
                text: chunk.payload.text.clone(),
            })
            .collect();

        if let Some(min_s) = min_score {
            hits.retain(|h| h.score >= min_s);
        }

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        hits
    }
}

/// Cosine similarity of two dense vectors; 0.0 when either norm vanishes.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 { 0.0 } else { dot / denom }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, text: &str, vector: Vec<f32>) -> IndexedChunk {
        IndexedChunk {
            payload: ChunkPayload {
                id: id.into(),
                source_url: "https://example.com/".into(),
                position: 0,
                text: text.into(),
                content_hash: blake3::hash(text.as_bytes()).to_hex().to_string(),
            },
            vector,
        }
    }

    fn index(chunks: Vec<IndexedChunk>) -> VectorIndex {
        VectorIndex::new(
            2,
            "key".into(),
            vec!["https://example.com/".into()],
            IndexStats::default(),
            chunks,
        )
    }

    #[test]
    fn cosine_is_one_for_parallel_vectors() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn search_ranks_by_similarity() {
        let ix = index(vec![
            chunk("a", "off topic", vec![0.0, 1.0]),
            chunk("b", "on topic", vec![1.0, 0.0]),
        ]);

        let hits = ix.search_vector(&[1.0, 0.0], 2, None);
        assert_eq!(hits[0].id, "b");
        assert_eq!(hits[1].id, "a");
    }

    #[test]
    fn min_score_filters_weak_hits() {
        let ix = index(vec![
            chunk("a", "off topic", vec![0.0, 1.0]),
            chunk("b", "on topic", vec![1.0, 0.0]),
        ]);

        let hits = ix.search_vector(&[1.0, 0.0], 2, Some(0.5));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");
    }
}
